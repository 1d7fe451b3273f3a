//! The communication object seen by operators, scalar products,
//! preconditioners and the aggregate publisher.

use super::CommValue;
use crate::core::traits::{check_len, SolverCategory};
use crate::error::SyncError;
use num_traits::Float;

/// Pulls a value out of a container before sending and pushes a received
/// value back into it.
///
/// This is the only place container-specific translation happens; the
/// transport just moves `Value`s between local indices. Every received value
/// is passed to `validate` before any is scattered, so a failing broadcast
/// leaves the destination untouched.
pub trait GatherScatter<C: ?Sized> {
    type Value: CommValue;
    fn gather(container: &C, i: usize) -> Result<Self::Value, SyncError>;
    /// Fail if `scatter(container, value, i)` would fail.
    fn validate(container: &C, value: &Self::Value, i: usize) -> Result<(), SyncError>;
    fn scatter(container: &mut C, value: Self::Value, i: usize) -> Result<(), SyncError>;
}

/// Plain vectors: gather reads the entry, scatter overwrites it.
pub struct CopyGatherScatter;

impl<T: CommValue> GatherScatter<[T]> for CopyGatherScatter {
    type Value = T;

    fn gather(container: &[T], i: usize) -> Result<T, SyncError> {
        container.get(i).copied().ok_or(SyncError::DimensionMismatch {
            expected: i + 1,
            found: container.len(),
        })
    }

    fn validate(container: &[T], _value: &T, i: usize) -> Result<(), SyncError> {
        if i < container.len() {
            Ok(())
        } else {
            Err(SyncError::DimensionMismatch { expected: i + 1, found: container.len() })
        }
    }

    fn scatter(container: &mut [T], value: T, i: usize) -> Result<(), SyncError> {
        let found = container.len();
        let slot = container
            .get_mut(i)
            .ok_or(SyncError::DimensionMismatch { expected: i + 1, found })?;
        *slot = value;
        Ok(())
    }
}

/// Consistency operations over a distributed index space.
///
/// All methods are collective for distributed implementations.
pub trait ParallelInformation {
    fn category(&self) -> SolverCategory;

    /// Copy each owner's value (gathered from `source`) into every overlap and
    /// copy replica (scattered into `dest`).
    fn copy_owner_to_all<G, C>(&self, source: &C, dest: &mut C) -> Result<(), SyncError>
    where
        G: GatherScatter<C>,
        C: ?Sized;

    /// [`copy_owner_to_all`](Self::copy_owner_to_all) with the same container
    /// as source and destination. All values are gathered before any is
    /// scattered.
    fn copy_owner_to_all_in_place<G, C>(&self, data: &mut C) -> Result<(), SyncError>
    where
        G: GatherScatter<C>,
        C: ?Sized;

    /// Zero every entry this process does not own.
    fn project<T: Float>(&self, x: &mut [T]);

    /// Globally consistent inner product of two vectors that are consistent
    /// on owner and overlap entries.
    fn dot<T: Float + CommValue>(&self, x: &[T], y: &[T]) -> Result<T, SyncError>;

    /// Globally consistent Euclidean norm, `sqrt(dot(x, x))`.
    fn norm<T: Float + CommValue>(&self, x: &[T]) -> Result<T, SyncError> {
        self.dot(x, x).map(|d| d.sqrt())
    }
}

/// Single-process communication object: every entry is owned, nothing is
/// replicated.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialInformation;

impl SequentialInformation {
    pub fn new() -> Self {
        SequentialInformation
    }
}

impl ParallelInformation for SequentialInformation {
    fn category(&self) -> SolverCategory {
        SolverCategory::Sequential
    }

    fn copy_owner_to_all<G, C>(&self, _source: &C, _dest: &mut C) -> Result<(), SyncError>
    where
        G: GatherScatter<C>,
        C: ?Sized,
    {
        Ok(())
    }

    fn copy_owner_to_all_in_place<G, C>(&self, _data: &mut C) -> Result<(), SyncError>
    where
        G: GatherScatter<C>,
        C: ?Sized,
    {
        Ok(())
    }

    fn project<T: Float>(&self, _x: &mut [T]) {}

    fn dot<T: Float + CommValue>(&self, x: &[T], y: &[T]) -> Result<T, SyncError> {
        check_len(x.len(), y.len())?;
        Ok(local_dot(x, y, |_| true))
    }
}

/// Sum of `x[i] * y[i]` over the entries selected by `mask`.
pub(crate) fn local_dot<T: Float>(x: &[T], y: &[T], mask: impl Fn(usize) -> bool) -> T {
    x.iter()
        .zip(y)
        .enumerate()
        .filter(|(i, _)| mask(*i))
        .fold(T::zero(), |acc, (_, (&a, &b))| acc + a * b)
}
