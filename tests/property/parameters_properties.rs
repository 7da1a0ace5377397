// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Parameters and the persisted topology form

use cim_network_topology::{Parameters, TopologyMap};
use proptest::prelude::*;

use super::strategies::{parameters, topology};

proptest! {
    /// Property: canonical encoding re-parses to an equal value
    #[test]
    fn prop_canonical_round_trip(params in parameters()) {
        let encoded = params.to_string();
        let decoded = Parameters::parse(&encoded).unwrap();
        prop_assert_eq!(&decoded, &params);
        prop_assert_eq!(decoded.to_string(), encoded);
    }

    /// Property: any well-formed address string parses and canonicalizes to itself
    #[test]
    fn prop_well_formed_mac_strings_parse(mac in "[0-9a-f]{2}(:[0-9a-f]{2}){5}") {
        let input = format!("frontend_mac={mac}");
        let params = Parameters::parse(&input).unwrap();
        prop_assert_eq!(params.to_string(), input);
    }

    /// Property: padding and unknown keys never change equality
    #[test]
    fn prop_spacing_and_unknown_keys_are_ignored(
        params in parameters(),
        pad in "[ \t]{0,3}",
        unknown in "[a-z]{1,6}=[a-z0-9]{0,4}",
    ) {
        prop_assume!(!unknown.starts_with("frontend_mac="));
        let noisy = format!("{pad}{unknown} {params}{pad}");
        prop_assert_eq!(Parameters::parse(&noisy).unwrap(), params);
    }

    /// Property: the persisted form reloads to the same topology, order included
    #[test]
    fn prop_persisted_form_reloads(map in topology()) {
        let json = map.to_json().unwrap();
        let reloaded = TopologyMap::from_json(&json).unwrap();
        prop_assert_eq!(&reloaded, &map);
        let original: Vec<_> = map.edges().cloned().collect();
        let reloaded_edges: Vec<_> = reloaded.edges().cloned().collect();
        prop_assert_eq!(reloaded_edges, original);
    }
}
