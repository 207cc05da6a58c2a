//! Teleinfo sensor task
//!
//! A single task owns the line source and drives the frame reader. The reader
//! keeps its own working snapshot; when a frame closes, a copy replaces the
//! shared one and the listener is notified. Consumers therefore never see a
//! half-applied frame, and a frame still open at shutdown is dropped.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use teleinfo_client::TeleinfoSensor;
//! use teleinfo_core::{SensorConfig, Snapshot};
//! use teleinfo_transport::LineTransport;
//!
//! # async fn run(port: tokio::io::DuplexStream) -> teleinfo_core::TeleinfoResult<()> {
//! let mut sensor = TeleinfoSensor::new(SensorConfig::new("Téléinfo"));
//! sensor
//!     .start(LineTransport::new(port), |snapshot: &Snapshot| {
//!         println!("BASE = {:?}", snapshot.primary_counter());
//!     })
//!     .await?;
//!
//! // ... later, on host shutdown
//! sensor.shutdown().await;
//! # Ok(())
//! # }
//! ```

use crate::descriptor::SensorDescriptor;
use crate::listener::UpdateListener;
use std::sync::Arc;
use teleinfo_core::{SensorConfig, Snapshot, TeleinfoError, TeleinfoResult};
use teleinfo_session::{FrameReader, ReaderStatistics};
use teleinfo_transport::LineSource;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;

/// Lifecycle of the sensor task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorState {
    /// Not started yet
    Idle,
    /// Reading frames
    Running,
    /// Stopped on request
    Stopped,
    /// Terminated by a stream-level error
    Failed(String),
}

impl SensorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SensorState::Stopped | SensorState::Failed(_))
    }
}

/// State shared between the sensor handle and its task
#[derive(Debug)]
struct Shared {
    snapshot: RwLock<Snapshot>,
    statistics: RwLock<ReaderStatistics>,
    state: RwLock<SensorState>,
}

/// Teleinfo sensor
///
/// Dropping the sensor stops its task the same way [`shutdown`](Self::shutdown)
/// does, without waiting for it.
#[derive(Debug)]
pub struct TeleinfoSensor {
    config: SensorConfig,
    shared: Arc<Shared>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<TeleinfoResult<()>>>,
}

impl TeleinfoSensor {
    pub fn new(config: SensorConfig) -> Self {
        Self {
            config,
            shared: Arc::new(Shared {
                snapshot: RwLock::new(Snapshot::new()),
                statistics: RwLock::new(ReaderStatistics::new()),
                state: RwLock::new(SensorState::Idle),
            }),
            shutdown_tx: None,
            task: None,
        }
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn descriptor(&self) -> SensorDescriptor {
        SensorDescriptor::from_config(&self.config)
    }

    /// Spawn the reading task
    ///
    /// # Arguments
    /// * `source` - An open line source; the sensor releases it on termination
    /// * `listener` - Notified once per closed frame
    ///
    /// A sensor whose task has terminated can be started again on a new
    /// source; the published snapshot carries over.
    ///
    /// # Errors
    /// `InvalidState` if the reading task is still running
    pub async fn start<S, L>(&mut self, source: S, listener: L) -> TeleinfoResult<()>
    where
        S: LineSource + 'static,
        L: UpdateListener,
    {
        if self.task.as_ref().is_some_and(|task| !task.is_finished()) {
            return Err(TeleinfoError::InvalidState(
                "Sensor has already been started".to_string(),
            ));
        }

        log::info!("Initializing Teleinfo sensor {}", self.config.name);
        let published = self.shared.snapshot.read().await.clone();
        let reader = FrameReader::from_config(source, &self.config).with_snapshot(published);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        *self.shared.state.write().await = SensorState::Running;
        self.shutdown_tx = Some(shutdown_tx);
        self.task = Some(tokio::spawn(read_loop(
            reader,
            self.shared.clone(),
            listener,
            shutdown_rx,
        )));
        Ok(())
    }

    /// Last published snapshot
    pub async fn snapshot(&self) -> Snapshot {
        self.shared.snapshot.read().await.clone()
    }

    /// Last successfully parsed primary counter
    pub async fn primary_counter(&self) -> Option<u64> {
        self.shared.snapshot.read().await.primary_counter()
    }

    /// Reader statistics as of the last closed frame or termination
    pub async fn statistics(&self) -> ReaderStatistics {
        self.shared.statistics.read().await.clone()
    }

    pub async fn state(&self) -> SensorState {
        self.shared.state.read().await.clone()
    }

    /// Stop the reading task and release the line source
    ///
    /// Safe to call before [`start`](Self::start) and more than once.
    pub async fn shutdown(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }

        if let Err(e) = self.join().await {
            log::debug!("Teleinfo task had already terminated: {}", e);
        }
    }

    /// Wait for the reading task to terminate
    ///
    /// # Returns
    /// `Ok(())` after a shutdown or if no task is running, otherwise the
    /// stream-level error that ended the task
    pub async fn join(&mut self) -> TeleinfoResult<()> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        match task.await {
            Ok(result) => result,
            Err(e) => {
                let message = format!("Teleinfo task aborted: {}", e);
                *self.shared.state.write().await = SensorState::Failed(message.clone());
                Err(TeleinfoError::InvalidState(message))
            }
        }
    }
}

async fn read_loop<S, L>(
    mut reader: FrameReader<S>,
    shared: Arc<Shared>,
    listener: L,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> TeleinfoResult<()>
where
    S: LineSource,
    L: UpdateListener,
{
    loop {
        tokio::select! {
            biased;

            // Fires on explicit shutdown and when the sensor handle is dropped.
            _ = &mut shutdown_rx => {
                return stop(&mut reader, &shared).await;
            }
            frame = reader.next_frame() => {
                match frame {
                    Ok(snapshot) => {
                        // A shutdown may have been requested while the frame was
                        // being read; nothing is published past that point.
                        if !matches!(shutdown_rx.try_recv(), Err(TryRecvError::Empty)) {
                            return stop(&mut reader, &shared).await;
                        }
                        let statistics = reader.statistics().clone();
                        on_frame_complete(&shared, &listener, snapshot, statistics).await;
                    }
                    Err(e) => {
                        log::error!("Teleinfo stream terminated: {}", e);
                        let _ = reader.close().await;
                        let statistics = reader.statistics().clone();
                        *shared.statistics.write().await = statistics;
                        *shared.state.write().await = SensorState::Failed(e.to_string());
                        return Err(e);
                    }
                }
            }
        }
    }
}

/// Publish a closed frame and notify the listener
///
/// Called exactly once per closed frame, whether or not any value changed.
async fn on_frame_complete<L: UpdateListener>(
    shared: &Shared,
    listener: &L,
    snapshot: Snapshot,
    statistics: ReaderStatistics,
) {
    *shared.snapshot.write().await = snapshot.clone();
    *shared.statistics.write().await = statistics;
    listener.on_update(&snapshot);
}

async fn stop<S: LineSource>(reader: &mut FrameReader<S>, shared: &Shared) -> TeleinfoResult<()> {
    log::info!("Stopping Teleinfo sensor");
    let result = reader.close().await;
    let statistics = reader.statistics().clone();
    *shared.statistics.write().await = statistics;
    *shared.state.write().await = SensorState::Stopped;
    result
}
