use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::math::color::{ColorMapper, Gradient};
use crate::math::heightmap::{self, HeightMap, LoadError};
use crate::math::mesh::{Mesh, Topology};

const SHUTDOWN_POLL: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, Debug)]
pub struct SceneOptions {
    pub topology: Topology,
    pub gradient: Gradient,
}

/// Everything one load produces. Immutable until the next load replaces it.
pub struct Scene {
    pub source: PathBuf,
    pub map: HeightMap,
    pub mesh: Mesh,
    pub colors: ColorMapper,
}

impl Scene {
    pub fn from_map(source: PathBuf, map: HeightMap, options: SceneOptions) -> Self {
        let colors = ColorMapper::new(options.gradient, map.min_z, map.max_z);
        let mesh = Mesh::build(&map, options.topology, &colors);
        Self {
            source,
            map,
            mesh,
            colors,
        }
    }

    pub fn load(path: &Path, options: SceneOptions) -> Result<Self, LoadError> {
        let map = heightmap::load_path(path)?;
        let scene = Self::from_map(path.to_path_buf(), map, options);
        tracing::info!(
            path = %path.display(),
            points = scene.map.len(),
            edges = scene.mesh.edges.len(),
            faces = scene.mesh.faces.len(),
            min_z = scene.map.min_z,
            max_z = scene.map.max_z,
            "loaded heightmap"
        );
        Ok(scene)
    }
}

pub enum LoaderCommand {
    Load { path: PathBuf, options: SceneOptions },
    Stop,
}

pub enum LoaderResult {
    Loaded(Box<Scene>),
    Error(String),
}

/// Rebuilds scenes off the render thread so a reload never stalls a frame.
pub struct LoaderEngine {
    tx_cmd: Sender<LoaderCommand>,
    rx_result: Receiver<LoaderResult>,
    last_error: Arc<Mutex<Option<String>>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl LoaderEngine {
    pub fn new() -> Self {
        let (tx_cmd, rx_cmd) = channel::unbounded::<LoaderCommand>();
        let (tx_result, rx_result) = channel::bounded::<LoaderResult>(2);
        let last_error = Arc::new(Mutex::new(None));
        let last_error_clone = Arc::clone(&last_error);

        let thread_handle = thread::spawn(move || {
            loader_thread(rx_cmd, tx_result, last_error_clone);
        });

        Self {
            tx_cmd,
            rx_result,
            last_error,
            thread_handle: Some(thread_handle),
        }
    }

    pub fn request_load(&self, path: &Path, options: SceneOptions) {
        let _ = self.tx_cmd.send(LoaderCommand::Load {
            path: path.to_path_buf(),
            options,
        });
    }

    pub fn try_recv_result(&self) -> Option<LoaderResult> {
        self.rx_result.try_recv().ok()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn stop(&self) {
        let _ = self.tx_cmd.send(LoaderCommand::Stop);
    }
}

impl Drop for LoaderEngine {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(LoaderCommand::Stop);
        if let Some(handle) = self.thread_handle.take() {
            // The worker may be parked on a full result channel; keep it
            // flowing until the thread exits.
            while !handle.is_finished() {
                let _ = self.rx_result.recv_timeout(SHUTDOWN_POLL);
            }
            let _ = handle.join();
        }
    }
}

fn loader_thread(
    rx_cmd: Receiver<LoaderCommand>,
    tx_result: Sender<LoaderResult>,
    last_error: Arc<Mutex<Option<String>>>,
) {
    loop {
        let mut cmd = match rx_cmd.recv() {
            Ok(c) => c,
            Err(_) => return,
        };

        // Only the newest queued request matters; a Stop anywhere wins.
        while let Ok(next) = rx_cmd.try_recv() {
            if matches!(next, LoaderCommand::Stop) {
                return;
            }
            cmd = next;
        }

        match cmd {
            LoaderCommand::Load { path, options } => {
                *last_error.lock() = None;

                let result = match Scene::load(&path, options) {
                    Ok(scene) => LoaderResult::Loaded(Box::new(scene)),
                    Err(e) => {
                        let message = e.to_string();
                        tracing::warn!(path = %path.display(), error = %message, "reload failed");
                        *last_error.lock() = Some(message.clone());
                        LoaderResult::Error(message)
                    }
                };

                if tx_result.send(result).is_err() {
                    return;
                }
            }
            LoaderCommand::Stop => return,
        }
    }
}
