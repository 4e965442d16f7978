//! Plan invariants over generated topologies.

use std::collections::HashMap;

use hpx_id::{RuId, UeId};
use hpx_planner::{fame, rank, PlanReport, Planner, PlannerConfig, ReservationPolicy, Snapshot};
use hpx_telemetry::{RuRecord, UeRecord};
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Topology {
    free: Vec<i64>,
    /// (home RU, demand, visible RUs) per UE
    ues: Vec<(usize, i64, Vec<usize>)>,
}

fn topology() -> impl Strategy<Value = Topology> {
    (2usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(-1i64..10, n),
            prop::collection::vec(
                (0..n, 0i64..6, prop::collection::vec(0..n, 0..5)),
                0..20,
            ),
        )
            .prop_map(|(free, ues)| Topology { free, ues })
    })
}

fn ru_id(i: usize) -> RuId {
    RuId::parse(&format!("RU_{i}")).unwrap()
}

fn ue_id(i: usize) -> UeId {
    UeId::parse(&format!("UE_{i}")).unwrap()
}

fn snapshot(topology: &Topology) -> Snapshot {
    let mut connections: HashMap<usize, Vec<UeId>> = HashMap::new();
    let mut ues = Vec::new();
    for (i, (home, demand, visible)) in topology.ues.iter().enumerate() {
        connections.entry(*home).or_default().push(ue_id(i));
        let mut near: Vec<RuId> = Vec::new();
        for ru in visible.iter().map(|v| ru_id(*v)) {
            if !near.contains(&ru) {
                near.push(ru);
            }
        }
        ues.push(UeRecord::new(ue_id(i), *demand, near).unwrap());
    }
    let rus = topology.free.iter().enumerate().map(|(i, free)| {
        RuRecord::new(ru_id(i), *free, connections.remove(&i).unwrap_or_default())
    });
    let investigate: Vec<RuId> = (0..topology.free.len()).map(ru_id).collect();
    Snapshot::from_records(&investigate, rus, ues)
}

fn plan(snapshot: &Snapshot, policy: ReservationPolicy) -> PlanReport {
    Planner::new(PlannerConfig {
        policy,
        ..PlannerConfig::default()
    })
    .plan_snapshot(snapshot)
}

fn policies() -> impl Strategy<Value = ReservationPolicy> {
    prop_oneof![
        Just(ReservationPolicy::Transactional),
        Just(ReservationPolicy::Eager),
    ]
}

proptest! {
    #[test]
    fn prop_destinations_never_exceed_capacity(t in topology(), policy in policies()) {
        let snapshot = snapshot(&t);
        let report = plan(&snapshot, policy);

        let mut assigned: HashMap<&RuId, i64> = HashMap::new();
        for (ue, handover) in report.plan.iter() {
            *assigned.entry(&handover.destination).or_insert(0) += snapshot.ue(ue).unwrap().demand;
        }
        for (ru, demand) in assigned {
            prop_assert!(demand <= snapshot.ru(ru).unwrap().free_prb, "{ru} overcommitted");
        }
    }

    #[test]
    fn prop_sleeping_rus_receive_nothing(t in topology(), policy in policies()) {
        let snapshot = snapshot(&t);
        let report = plan(&snapshot, policy);
        let destinations = report.plan.destinations();
        for ru in report.asleep() {
            prop_assert!(!destinations.contains(ru), "{ru} asleep and receiving");
        }
    }

    #[test]
    fn prop_every_ue_of_a_sleeping_ru_is_moved(t in topology(), policy in policies()) {
        let snapshot = snapshot(&t);
        let report = plan(&snapshot, policy);
        let asleep: Vec<&RuId> = report.asleep().collect();

        for ru in &asleep {
            for ue in &snapshot.ru(ru).unwrap().connections {
                let handover = report.plan.get(ue);
                prop_assert!(handover.is_some(), "{ue} stranded on {ru}");
                prop_assert_eq!(&handover.unwrap().origin, *ru);
            }
        }
        for (_, handover) in report.plan.iter() {
            prop_assert!(asleep.contains(&&handover.origin));
        }
    }

    #[test]
    fn prop_planning_is_deterministic(t in topology(), policy in policies()) {
        let snapshot = snapshot(&t);
        let first = plan(&snapshot, policy);
        let second = plan(&snapshot, policy);
        prop_assert_eq!(first.payload(), second.payload());
        prop_assert_eq!(first.verdicts, second.verdicts);
    }

    #[test]
    fn prop_ranking_is_deterministic(t in topology()) {
        let (index, _) = fame::build_index(&snapshot(&t));
        let order = rank::rank(&index);
        prop_assert_eq!(&order, &rank::rank(&index.clone()));
        for pair in order.windows(2) {
            prop_assert!((pair[0].fame, &pair[0].id) < (pair[1].fame, &pair[1].id));
        }
    }
}
