use std::any::Any;

use diesel::connection::Connection;
use diesel::SqliteConnection;
use log::{debug, error};
use tokio::sync::{mpsc, oneshot};

use super::DbPool;
use crate::errors::StorageError;
use pocketpilot_core::errors::{DatabaseError, Error, Result};

type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type AnyBox = Box<dyn Any + Send + 'static>;
type Envelope = (Job<AnyBox>, oneshot::Sender<Result<AnyBox>>);

const QUEUE_DEPTH: usize = 1024;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

impl WriteHandle {
    /// Runs `job` on the writer's dedicated connection inside an immediate transaction.
    ///
    /// Any error returned by the job rolls the whole transaction back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (ret_tx, ret_rx) = oneshot::channel();
        let boxed: Job<AnyBox> = Box::new(move |c| job(c).map(|v| Box::new(v) as AnyBox));

        self.tx
            .send((boxed, ret_tx))
            .await
            .map_err(|_| writer_gone("writer queue is closed"))?;

        let value = ret_rx
            .await
            .map_err(|_| writer_gone("writer dropped the reply"))??;

        value
            .downcast::<T>()
            .map(|v| *v)
            .map_err(|_| Error::Unexpected("Writer returned an unexpected result type".to_string()))
    }
}

fn writer_gone(reason: &str) -> Error {
    Error::Database(DatabaseError::Internal(format!(
        "Database writer unavailable: {}",
        reason
    )))
}

/// Spawns the task that owns the single write connection and applies jobs in order.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(QUEUE_DEPTH);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer actor could not acquire a connection: {}", e);
                // Dropping the receiver fails every pending and future job.
                return;
            }
        };
        debug!("Database writer started");

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<AnyBox> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            // The caller may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
        debug!("Database writer stopped");
    });

    WriteHandle { tx }
}
