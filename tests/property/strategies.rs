// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shared proptest strategies

use cim_network_topology::{MacAddress, Parameters, TopologyMap};
use proptest::prelude::*;

/// Domain names from a small pool so edges collide often
pub fn domain_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(str::to_string)
}

/// Empty parameters or a random hardware address
pub fn parameters() -> impl Strategy<Value = Parameters> {
    prop_oneof![
        Just(Parameters::empty()),
        any::<[u8; 6]>().prop_map(|octets| {
            Parameters::empty().with_frontend_mac(MacAddress::from_octets(octets))
        }),
        // A couple of fixed values so equal configs show up on both sides
        Just(Parameters::parse("frontend_mac=00:16:3e:00:00:01").unwrap()),
        Just(Parameters::parse("frontend_mac=00:16:3e:00:00:02").unwrap()),
    ]
}

/// Topology built from random conjoins, self-loops excluded
pub fn topology() -> impl Strategy<Value = TopologyMap> {
    prop::collection::vec(
        (
            domain_name(),
            domain_name(),
            parameters(),
            prop::option::of("[0-9]{1,2}"),
        ),
        0..12,
    )
    .prop_map(|edges| {
        let mut map = TopologyMap::new();
        for (backend, frontend, config, interface_id) in edges {
            if backend != frontend {
                map.conjoin(backend, frontend, config, interface_id);
            }
        }
        map
    })
}
