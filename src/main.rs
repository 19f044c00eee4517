use std::path::PathBuf;
use std::time::Duration;

use log::*;

use shader_meta::config::env_flag;
use shader_meta::*;

const WATCH_POLL_DELAY: Duration = Duration::from_millis(250);

fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(shaders_source_dir), Some(metadata_dir)) = (args.next(), args.next()) else {
        anyhow::bail!("usage: shader-meta <shader source dir> <metadata dir>");
    };

    let backend = match std::env::var("SHADER_META_BACKEND") {
        Ok(name) => name.parse()?,
        Err(_) => Backend::default(),
    };

    let config = build_tasks::Config {
        backend,
        shaders_source_dir: PathBuf::from(shaders_source_dir),
        metadata_dir: PathBuf::from(metadata_dir),
        tools: ToolPaths::from_env(),
    };

    build_tasks::write_shader_metadata(&config)?;

    if !env_flag("SHADER_META_WATCH") {
        return Ok(());
    }

    info!("watching {} for changes", config.shaders_source_dir.display());
    let extractor = Extractor::new(config.tools.clone(), config.metadata_dir.clone());
    let mut changes = shader_watcher::watch(&config.shaders_source_dir)?;
    loop {
        for shader_path in changes.changed_shaders()? {
            if !shader_path.exists() {
                continue;
            }

            if let Err(err) = build_tasks::write_one(&config, &extractor, &shader_path) {
                error!("{}: {err:#}", shader_path.display());
            }
        }

        std::thread::sleep(WATCH_POLL_DELAY);
    }
}
