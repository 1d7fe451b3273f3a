// single-process communicator

use super::{Comm, CommValue};
use crate::error::SyncError;

/// A communicator of size one.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialComm;

impl SerialComm {
    pub fn new() -> Self {
        SerialComm
    }
}

impl Comm for SerialComm {
    fn rank(&self) -> usize { 0 }
    fn size(&self) -> usize { 1 }
    fn barrier(&self) {}
    fn all_reduce(&self, x: f64) -> Result<f64, SyncError> {
        Ok(x)
    }
    fn exchange<T: CommValue>(
        &self,
        sends: Vec<(usize, Vec<T>)>,
        recvs: &[(usize, usize)],
    ) -> Result<Vec<Vec<T>>, SyncError> {
        if !sends.is_empty() || !recvs.is_empty() {
            return Err(SyncError::Communication(
                "serial communicator has no peers to exchange with".into(),
            ));
        }
        Ok(Vec::new())
    }
}
