use std::path::{Path, PathBuf};
use std::sync::mpsc;

use log::*;
use notify::{Event, RecursiveMode, Watcher};

use crate::shaders::ShaderStage;

pub struct ShaderChanges {
    #[expect(unused)]
    watcher: notify::RecommendedWatcher,
    receiver: mpsc::Receiver<notify::Result<Event>>,
}

impl ShaderChanges {
    /// gathers all shader source edit events since this function was last called
    pub fn events(&mut self) -> anyhow::Result<Vec<notify::Event>> {
        let events: notify::Result<Vec<notify::Event>> = self.receiver.try_iter().collect();
        let mut events = events?;

        events.retain(|event| match event.kind {
            notify::EventKind::Create(_) => true,
            notify::EventKind::Modify(_) => true,
            notify::EventKind::Remove(_) => true,

            notify::EventKind::Access(_) => false,
            notify::EventKind::Any => {
                error!("unexpected notify event: {event:?}");
                false
            }
            notify::EventKind::Other => {
                error!("unexpected notify event: {event:?}");
                false
            }
        });

        Ok(events)
    }

    /// shader files touched since the last call, deduplicated and sorted
    pub fn changed_shaders(&mut self) -> anyhow::Result<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = self
            .events()?
            .into_iter()
            .flat_map(|event| event.paths)
            .filter(|path| ShaderStage::from_path(path) != ShaderStage::Unknown)
            .collect();
        paths.sort();
        paths.dedup();

        Ok(paths)
    }
}

pub fn watch(shaders_source_dir: &Path) -> notify::Result<ShaderChanges> {
    let (sender, receiver) = mpsc::channel::<notify::Result<Event>>();

    let mut watcher = notify::recommended_watcher(sender)?;
    watcher.watch(shaders_source_dir, RecursiveMode::Recursive)?;

    Ok(ShaderChanges { watcher, receiver })
}
