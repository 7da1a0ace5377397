// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Diff Engine

use cim_network_topology::{diff, Action, DiffEntry, EdgeId, TopologyMap};
use proptest::prelude::*;

use super::strategies::{domain_name, topology};

/// Replay a plan against `active` the way a fully successful pass would
fn apply_plan(active: &TopologyMap, plan: &[DiffEntry]) -> TopologyMap {
    let mut result = active.clone();
    for entry in plan {
        match entry.action {
            Action::Add => result.conjoin(
                entry.backend(),
                entry.frontend(),
                entry.config.clone(),
                Some("new".to_string()),
            ),
            Action::Remove => {
                result.disjoin(entry.backend(), entry.frontend()).unwrap();
            }
        }
    }
    result
}

fn entries_for<'a>(plan: &'a [DiffEntry], edge: &EdgeId) -> Vec<&'a DiffEntry> {
    plan.iter().filter(|entry| &entry.edge == edge).collect()
}

proptest! {
    /// Property: a topology diffed against itself needs no action
    #[test]
    fn prop_diff_with_self_is_empty(map in topology()) {
        prop_assert!(diff(&map, &map, None).is_empty());
    }

    /// Property: every edge yields exactly the entries its membership demands
    #[test]
    fn prop_diff_is_complete(desired in topology(), active in topology()) {
        let plan = diff(&desired, &active, None);
        let mut expected_len = 0;

        for (edge, wanted) in desired.iter() {
            let entries = entries_for(&plan, edge);
            match active.get(edge) {
                None => {
                    prop_assert_eq!(entries.len(), 1);
                    prop_assert_eq!(entries[0].action, Action::Add);
                    prop_assert_eq!(&entries[0].config, &wanted.config);
                    expected_len += 1;
                }
                Some(current) if current.config != wanted.config => {
                    prop_assert_eq!(entries.len(), 2);
                    prop_assert_eq!(entries[0].action, Action::Remove);
                    prop_assert_eq!(&entries[0].config, &current.config);
                    prop_assert_eq!(entries[1].action, Action::Add);
                    prop_assert_eq!(&entries[1].config, &wanted.config);

                    let position = plan.iter().position(|e| &e.edge == edge).unwrap();
                    prop_assert_eq!(&plan[position + 1].edge, edge);
                    expected_len += 2;
                }
                Some(_) => prop_assert!(entries.is_empty()),
            }
        }

        for (edge, current) in active.iter() {
            if !desired.contains(edge) {
                let entries = entries_for(&plan, edge);
                prop_assert_eq!(entries.len(), 1);
                prop_assert_eq!(entries[0].action, Action::Remove);
                prop_assert_eq!(&entries[0].config, &current.config);
                expected_len += 1;
            }
        }

        prop_assert_eq!(plan.len(), expected_len);
    }

    /// Property: a scoped diff is the order-preserving subset touching the domain
    #[test]
    fn prop_scoped_diff_is_filtered_subset(
        desired in topology(),
        active in topology(),
        domain in domain_name(),
    ) {
        let scoped = diff(&desired, &active, Some(domain.as_str()));
        let filtered: Vec<DiffEntry> = diff(&desired, &active, None)
            .into_iter()
            .filter(|entry| entry.backend() == domain || entry.frontend() == domain)
            .collect();
        prop_assert_eq!(scoped, filtered);
    }

    /// Property: applying the full plan converges active to desired
    #[test]
    fn prop_plan_converges(desired in topology(), active in topology()) {
        let plan = diff(&desired, &active, None);
        let converged = apply_plan(&active, &plan);

        prop_assert_eq!(converged.len(), desired.len());
        for (edge, wanted) in desired.iter() {
            prop_assert_eq!(
                converged.config(edge.backend(), edge.frontend()),
                Some(&wanted.config)
            );
        }
        prop_assert!(diff(&desired, &converged, None).is_empty());
    }
}
