//! Aggregate publication across in-process ranks.
//!
//! The shared partition has four global DOFs. Rank 0 owns 0 and 2 and copies 1;
//! rank 1 owns 1 and 3 and copies 0 and 2. Rank 0 groups vertex 2 with vertex 0.

use schwarz_sync::aggregates::{
    publish_aggregates, AggregateState, AggregatesMap, GlobalAggregatesMap, ISOLATED_MARKER,
};
use schwarz_sync::index::{Attribute, IndexPair, ParallelIndexSet};
use schwarz_sync::parallel::{Comm, OwnerOverlapCopyCommunication, SequentialInformation, ThreadComm};
use schwarz_sync::error::SyncError;

use AggregateState::{Assigned, Isolated, Unaggregated};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn partition(rank: usize) -> ParallelIndexSet {
    let pairs = if rank == 0 {
        vec![
            IndexPair::new(0, 0, Attribute::Owner),
            IndexPair::new(1, 1, Attribute::Copy),
            IndexPair::new(2, 2, Attribute::Owner),
        ]
    } else {
        vec![
            IndexPair::new(1, 0, Attribute::Owner),
            IndexPair::new(2, 1, Attribute::Copy),
            IndexPair::new(3, 2, Attribute::Owner),
            IndexPair::new(0, 3, Attribute::Copy),
        ]
    };
    ParallelIndexSet::new(pairs).unwrap()
}

#[test]
fn copy_of_dof_two_resolves_to_owner_aggregate() {
    init_logger();
    let out = ThreadComm::run(2, |comm| {
        let rank = comm.rank();
        let info = OwnerOverlapCopyCommunication::new(comm, partition(rank)).unwrap();
        let mut aggs = if rank == 0 {
            AggregatesMap::from_states(vec![Assigned(0), Assigned(1), Assigned(0)])
        } else {
            AggregatesMap::from_states(vec![Assigned(0), Unaggregated, Assigned(2), Unaggregated])
        };
        let lookup = info.global_lookup();
        publish_aggregates(&mut aggs, &info, &lookup).unwrap();

        let globals: Vec<i64> = {
            let view = GlobalAggregatesMap::new(&mut aggs, &lookup);
            (0..view.len()).map(|i| view.get(i).unwrap()).collect()
        };
        (aggs, globals)
    });

    let (aggs0, globals0) = &out[0];
    let (aggs1, globals1) = &out[1];

    // owners keep their choice; the copy of global 1 is renamed by rank 1
    assert_eq!(aggs0, &AggregatesMap::from_states(vec![Assigned(0), Assigned(1), Assigned(0)]));
    assert_eq!(globals0, &vec![0, 1, 0]);

    // global 2 and global 0 land in rank 1's slot for global 0
    assert_eq!(aggs1[1], Assigned(3));
    assert_eq!(aggs1[3], Assigned(3));
    assert_eq!(globals1[1], globals0[2]);
    assert_eq!(globals1, &vec![1, 0, 3, 0]);
    assert!(aggs1.is_complete());
}

#[test]
fn isolated_owner_propagates_as_isolated() {
    init_logger();
    let out = ThreadComm::run(2, |comm| {
        let rank = comm.rank();
        let info = OwnerOverlapCopyCommunication::new(comm, partition(rank)).unwrap();
        let mut aggs = if rank == 0 {
            AggregatesMap::from_states(vec![Assigned(0), Unaggregated, Isolated])
        } else {
            AggregatesMap::from_states(vec![Isolated, Assigned(3), Assigned(2), Unaggregated])
        };
        let lookup = info.global_lookup();
        publish_aggregates(&mut aggs, &info, &lookup).unwrap();
        let view = GlobalAggregatesMap::new(&mut aggs, &lookup);
        (0..view.len()).map(|i| view.get(i).unwrap()).collect::<Vec<_>>()
    });
    assert_eq!(out[0], vec![0, ISOLATED_MARKER, ISOLATED_MARKER]);
    assert_eq!(out[1], vec![ISOLATED_MARKER, ISOLATED_MARKER, 3, 0]);
}

#[test]
fn unaggregated_owner_is_an_invariant_violation() {
    // each rank owns one DOF the other copies; both owners are unclassified,
    // so both ranks fail before any message is posted
    let out = ThreadComm::run(2, |comm| {
        let rank = comm.rank();
        let pairs = vec![
            IndexPair::new(0, 0, if rank == 0 { Attribute::Owner } else { Attribute::Copy }),
            IndexPair::new(1, 1, if rank == 1 { Attribute::Owner } else { Attribute::Copy }),
        ];
        let info = OwnerOverlapCopyCommunication::new(comm, ParallelIndexSet::new(pairs).unwrap()).unwrap();
        let mut aggs = AggregatesMap::new(2);
        let lookup = info.global_lookup();
        publish_aggregates(&mut aggs, &info, &lookup)
    });
    for result in out {
        assert!(matches!(result, Err(SyncError::InvariantViolation(_))));
    }
}

#[test]
fn sequential_publication_leaves_the_map_untouched() {
    let set = ParallelIndexSet::identity(3);
    let lookup = schwarz_sync::index::GlobalLookupIndexSet::new(&set);
    let before = AggregatesMap::from_states(vec![Assigned(0), Unaggregated, Isolated]);
    let mut aggs = before.clone();
    publish_aggregates(&mut aggs, &SequentialInformation::new(), &lookup).unwrap();
    assert_eq!(aggs, before);
}

#[test]
fn receive_only_peer_of_a_failed_owner_gets_an_error() {
    // rank 0 owns global 0 but never classified it; rank 1 only holds a copy
    let out = ThreadComm::run(2, |comm| {
        let rank = comm.rank();
        let attribute = if rank == 0 { Attribute::Owner } else { Attribute::Copy };
        let set = ParallelIndexSet::new(vec![IndexPair::new(0, 0, attribute)]).unwrap();
        let info = OwnerOverlapCopyCommunication::new(comm, set).unwrap();
        let mut aggs = AggregatesMap::new(1);
        let lookup = info.global_lookup();
        publish_aggregates(&mut aggs, &info, &lookup)
    });
    assert!(matches!(out[0], Err(SyncError::InvariantViolation(_))));
    assert!(matches!(out[1], Err(SyncError::Communication(_))));
}

#[test]
fn unknown_aggregate_leaves_every_replica_untouched() {
    // rank 0 groups global 2 with global 1, which rank 1 does not hold
    let out = ThreadComm::run(2, |comm| {
        let rank = comm.rank();
        let pairs = if rank == 0 {
            vec![
                IndexPair::new(0, 0, Attribute::Owner),
                IndexPair::new(1, 1, Attribute::Owner),
                IndexPair::new(2, 2, Attribute::Owner),
            ]
        } else {
            vec![IndexPair::new(0, 0, Attribute::Copy), IndexPair::new(2, 1, Attribute::Copy)]
        };
        let info = OwnerOverlapCopyCommunication::new(comm, ParallelIndexSet::new(pairs).unwrap()).unwrap();
        let mut aggs = if rank == 0 {
            AggregatesMap::from_states(vec![Assigned(0), Assigned(1), Assigned(1)])
        } else {
            AggregatesMap::from_states(vec![Isolated, Isolated])
        };
        let lookup = info.global_lookup();
        let result = publish_aggregates(&mut aggs, &info, &lookup);
        (result, aggs)
    });
    assert!(out[0].0.is_ok());
    assert!(matches!(out[1].0, Err(SyncError::InvariantViolation(_))));
    // global 0 would have resolved, but nothing is written when global 2 fails
    assert_eq!(out[1].1, AggregatesMap::from_states(vec![Isolated, Isolated]));
}

#[test]
fn three_ranks_agree_through_overlap_and_copy_replicas() {
    // rank 0 owns 0,1 and overlaps 2; rank 1 owns 2,3 and overlaps 1;
    // rank 2 copies 1,2,3. Rank 0 puts global 1 into the aggregate named by
    // global 2, which rank 1 owns.
    let out = ThreadComm::run(3, |comm| {
        let rank = comm.rank();
        let (pairs, states) = match rank {
            0 => (
                vec![
                    IndexPair::new(0, 0, Attribute::Owner),
                    IndexPair::new(1, 1, Attribute::Owner),
                    IndexPair::new(2, 2, Attribute::Overlap),
                ],
                vec![Assigned(0), Assigned(2), Unaggregated],
            ),
            1 => (
                vec![
                    IndexPair::new(2, 0, Attribute::Owner),
                    IndexPair::new(3, 1, Attribute::Owner),
                    IndexPair::new(1, 2, Attribute::Overlap),
                ],
                vec![Assigned(0), Assigned(0), Unaggregated],
            ),
            _ => (
                vec![
                    IndexPair::new(1, 0, Attribute::Copy),
                    IndexPair::new(2, 1, Attribute::Copy),
                    IndexPair::new(3, 2, Attribute::Copy),
                ],
                vec![Unaggregated; 3],
            ),
        };
        let info = OwnerOverlapCopyCommunication::new(comm, ParallelIndexSet::new(pairs).unwrap()).unwrap();
        let mut aggs = AggregatesMap::from_states(states);
        let lookup = info.global_lookup();
        publish_aggregates(&mut aggs, &info, &lookup).unwrap();
        assert!(aggs.is_complete());
        let view = GlobalAggregatesMap::new(&mut aggs, &lookup);
        info.index_set()
            .iter()
            .map(|p| (p.global(), view.get(p.local()).unwrap()))
            .collect::<Vec<_>>()
    });

    // (global dof, global aggregate) in ascending dof order
    assert_eq!(out[0], vec![(0, 0), (1, 2), (2, 2)]);
    assert_eq!(out[1], vec![(1, 2), (2, 2), (3, 2)]);
    assert_eq!(out[2], vec![(1, 2), (2, 2), (3, 2)]);

    // every replica of a dof names the aggregate its owner chose
    for dof in 0..4 {
        let names: Vec<_> = out.iter().flatten().filter(|(g, _)| *g == dof).map(|&(_, a)| a).collect();
        assert!(names.windows(2).all(|w| w[0] == w[1]), "dof {dof}: {names:?}");
    }
}
