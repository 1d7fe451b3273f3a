//! In-process multi-rank communicator.
//!
//! Each rank is a thread holding one `ThreadComm`; messages travel over
//! crossbeam channels. Every collective call carries a sequence number and an
//! operation kind, so a peer that is inside a different collective is reported
//! as [`SyncError::CollectiveMismatch`] instead of silently pairing the wrong
//! messages. A rank holds no sender to its own inbox, so once every peer has
//! dropped its communicator a pending receive fails with
//! [`SyncError::Communication`]. A live peer that never makes the matching
//! call still blocks the receiver, as with any blocking transport.

use super::{Comm, CommValue};
use crate::error::SyncError;
use crossbeam::channel::{unbounded, Receiver, Sender};
use log::trace;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::{Arc, Barrier};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Collective {
    AllReduce,
    Exchange,
}

struct Envelope {
    from: usize,
    seq: u64,
    kind: Collective,
    payload: Box<dyn Any + Send>,
}

pub struct ThreadComm {
    rank: usize,
    size: usize,
    // indexed by rank; `None` at this rank
    peers: Vec<Option<Sender<Envelope>>>,
    inbox: Receiver<Envelope>,
    // messages from other peers that arrived while waiting for a specific one
    pending: RefCell<VecDeque<Envelope>>,
    barrier: Arc<Barrier>,
    seq: Cell<u64>,
}

impl ThreadComm {
    /// Create `size` connected communicators, one per rank.
    pub fn universe(size: usize) -> Vec<ThreadComm> {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..size).map(|_| unbounded()).unzip();
        let barrier = Arc::new(Barrier::new(size.max(1)));
        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| ThreadComm {
                rank,
                size,
                peers: senders
                    .iter()
                    .enumerate()
                    .map(|(p, tx)| (p != rank).then(|| tx.clone()))
                    .collect(),
                inbox,
                pending: RefCell::new(VecDeque::new()),
                barrier: Arc::clone(&barrier),
                seq: Cell::new(0),
            })
            .collect()
    }

    /// Run `f` on `size` ranks, one scoped thread each, and collect the
    /// results in rank order. A panic on any rank is propagated.
    pub fn run<R, F>(size: usize, f: F) -> Vec<R>
    where
        F: Fn(ThreadComm) -> R + Sync,
        R: Send,
    {
        let f = &f;
        std::thread::scope(|scope| {
            let handles: Vec<_> = Self::universe(size)
                .into_iter()
                .map(|comm| scope.spawn(move || f(comm)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }

    fn next_seq(&self) -> u64 {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        seq
    }

    fn post(&self, dest: usize, seq: u64, kind: Collective, payload: Box<dyn Any + Send>) -> Result<(), SyncError> {
        let peer = self.peers.get(dest).ok_or_else(|| {
            SyncError::Communication(format!("rank {dest} out of range for size {}", self.size))
        })?;
        let peer = peer.as_ref().ok_or_else(|| {
            SyncError::Communication(format!("rank {dest} cannot send to itself"))
        })?;
        peer.send(Envelope { from: self.rank, seq, kind, payload })
            .map_err(|_| SyncError::Communication(format!("rank {dest} hung up")))
    }

    fn receive(&self, peer: usize, seq: u64, kind: Collective) -> Result<Box<dyn Any + Send>, SyncError> {
        let mut pending = self.pending.borrow_mut();
        let stashed = pending.iter().position(|e| e.from == peer);
        let stashed = stashed.and_then(|pos| pending.remove(pos));
        let envelope = match stashed {
            Some(envelope) => envelope,
            None => loop {
                let envelope = self.inbox.recv().map_err(|_| {
                    SyncError::Communication(format!(
                        "rank {} waited on rank {peer}, but every peer has hung up",
                        self.rank
                    ))
                })?;
                if envelope.from == peer {
                    break envelope;
                }
                pending.push_back(envelope);
            },
        };
        if envelope.seq != seq || envelope.kind != kind {
            return Err(SyncError::CollectiveMismatch {
                rank: self.rank,
                peer,
                expected: format!("{kind:?} #{seq}"),
                found: format!("{:?} #{}", envelope.kind, envelope.seq),
            });
        }
        Ok(envelope.payload)
    }
}

impl Comm for ThreadComm {
    fn rank(&self) -> usize { self.rank }
    fn size(&self) -> usize { self.size }

    fn barrier(&self) {
        self.next_seq();
        self.barrier.wait();
    }

    fn all_reduce(&self, x: f64) -> Result<f64, SyncError> {
        let seq = self.next_seq();
        for dest in (0..self.size).filter(|&p| p != self.rank) {
            self.post(dest, seq, Collective::AllReduce, Box::new(x))?;
        }
        // sum in rank order so every rank computes the identical value
        let mut sum = 0.0;
        for p in 0..self.size {
            if p == self.rank {
                sum += x;
            } else {
                let payload = self.receive(p, seq, Collective::AllReduce)?;
                let v = payload.downcast::<f64>().map_err(|_| {
                    SyncError::Communication(format!("rank {p} sent a non-scalar reduction payload"))
                })?;
                sum += *v;
            }
        }
        Ok(sum)
    }

    fn exchange<T: CommValue>(
        &self,
        sends: Vec<(usize, Vec<T>)>,
        recvs: &[(usize, usize)],
    ) -> Result<Vec<Vec<T>>, SyncError> {
        let seq = self.next_seq();
        for (dest, buf) in sends {
            if dest == self.rank {
                return Err(SyncError::Communication(format!("rank {dest} cannot send to itself")));
            }
            trace!("rank {} -> {}: {} values (#{seq})", self.rank, dest, buf.len());
            self.post(dest, seq, Collective::Exchange, Box::new(buf))?;
        }
        let mut received = Vec::with_capacity(recvs.len());
        for &(src, len) in recvs {
            let payload = self.receive(src, seq, Collective::Exchange)?;
            let buf = payload.downcast::<Vec<T>>().map_err(|_| {
                SyncError::Communication(format!("rank {src} sent a payload of unexpected type"))
            })?;
            if buf.len() != len {
                return Err(SyncError::InvariantViolation(format!(
                    "rank {} expected {len} values from rank {src} but received {}; partitions disagree",
                    self.rank,
                    buf.len()
                )));
            }
            received.push(*buf);
        }
        Ok(received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_reduce_sums_over_ranks() {
        let sums = ThreadComm::run(4, |comm| comm.all_reduce(comm.rank() as f64 + 1.0).unwrap());
        assert_eq!(sums, vec![10.0; 4]);
    }

    #[test]
    fn ring_exchange() {
        let got = ThreadComm::run(3, |comm| {
            let n = comm.size();
            let right = (comm.rank() + 1) % n;
            let left = (comm.rank() + n - 1) % n;
            let out = comm
                .exchange(vec![(right, vec![comm.rank() as i64; 2])], &[(left, 2)])
                .unwrap();
            out[0][0]
        });
        assert_eq!(got, vec![2, 0, 1]);
    }

    #[test]
    fn mismatched_collectives_are_reported() {
        let results = ThreadComm::run(2, |comm| {
            if comm.rank() == 0 {
                // rank 0 reduces while rank 1 exchanges
                comm.all_reduce(1.0).map(|_| ())
            } else {
                comm.exchange(vec![(0, vec![1.0f64])], &[(0, 1)]).map(|_| ())
            }
        });
        assert!(results.iter().all(|r| matches!(r, Err(SyncError::CollectiveMismatch { .. }))));
    }

    #[test]
    fn receiving_from_a_departed_peer_fails() {
        let results = ThreadComm::run(2, |comm| {
            if comm.rank() == 0 {
                // leaves without posting anything
                Ok(Vec::new())
            } else {
                comm.exchange::<f64>(Vec::new(), &[(0, 1)])
            }
        });
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(SyncError::Communication(_))));
    }

    #[test]
    fn length_disagreement_is_an_invariant_violation() {
        let results = ThreadComm::run(2, |comm| {
            let peer = 1 - comm.rank();
            comm.exchange(vec![(peer, vec![0i64; 1 + comm.rank()])], &[(peer, 1)])
        });
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }
}
