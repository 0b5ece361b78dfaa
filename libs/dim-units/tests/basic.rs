use dim_units::{catalog, Dimension, Error};

#[test]
fn dimension_algebra_group_laws() {
    let velocity = Dimension::new(1, 0, -1, 0, 0, 0, 0);
    let force = Dimension::new(1, 1, -2, 0, 0, 0, 0);

    assert_eq!(velocity + Dimension::ZERO, velocity);
    assert_eq!(velocity - velocity, Dimension::ZERO);
    assert_eq!(velocity + force, force + velocity);
    assert_eq!((velocity + force) - force, velocity);
}

#[test]
fn fractional_pow_needs_integer_exponents() {
    let area = Dimension::new(2, 0, 0, 0, 0, 0, 0);
    assert_eq!(area.powf(0.5).unwrap(), Dimension::LENGTH);
    assert_eq!(area.powf(1.5).unwrap(), Dimension::new(3, 0, 0, 0, 0, 0, 0));
    assert_eq!(Dimension::LENGTH.powf(0.5), Err(Error::NonIntegerDim));
}

#[test]
fn conversion_round_trip() {
    let samples = [-1e6, -273.15, -1.0, 0.0, 0.5, 37.0, 1e6];
    for registry in catalog::builtin() {
        for unit in registry.units() {
            for &v in &samples {
                let rt = unit.from_canonical(unit.to_canonical(v));
                assert!(
                    (rt - v).abs() <= 1e-9 * v.abs().max(1.0),
                    "{} failed to round-trip {v}: got {rt}",
                    unit.symbol
                );
            }
        }
    }
}

#[test]
fn prefix_expansion_scale_law() {
    let si = catalog::si_registry();
    for prefix in si.prefixes() {
        for base in ["m", "s", "g", "W", "Pa"] {
            let base_unit = si.find_exact(base).unwrap().clone();
            let combined = format!("{}{}", prefix.symbol, base);
            // An exact symbol may shadow the prefixed spelling ("min");
            // the law only covers actual prefix expansions.
            if si.find_exact(&combined).is_some() {
                continue;
            }
            let expanded = si.find(&combined).unwrap();
            assert_eq!(expanded.scale, base_unit.scale * prefix.factor);
            assert_eq!(expanded.dim, base_unit.dim);
            assert_eq!(expanded.symbol, combined);
        }
    }
}

#[test]
fn affine_spot_values() {
    let si = catalog::si_registry();
    let c = si.find_exact("C").unwrap();
    assert!((c.to_canonical(10.0) - 283.15).abs() < 1e-9);
    assert!((c.to_canonical(-273.15)).abs() < 1e-9);

    let imperial = &catalog::builtin()[1];
    let f = imperial.find_exact("F").unwrap();
    assert!((f.to_canonical(32.0) - 273.15).abs() < 1e-9);
    assert!((f.to_canonical(212.0) - 373.15).abs() < 1e-9);
    assert!((f.from_canonical(255.372_222) - 0.0).abs() < 1e-4);
}

#[test]
fn aliases_reach_their_units() {
    let si = catalog::si_registry();
    assert_eq!(si.find_exact("Newton").unwrap().symbol, "N");
    assert_eq!(si.find_exact("degC").unwrap().symbol, "C");
    assert_eq!(si.find_exact("hour").unwrap().scale, 3600.0);

    let imperial = &catalog::builtin()[1];
    assert_eq!(imperial.find_exact("mile").unwrap().symbol, "mi");
}

#[test]
fn prefixes_never_cross_registries() {
    // Imperial has no prefixes, so "kft" must not resolve anywhere in it.
    let imperial = &catalog::builtin()[1];
    assert!(imperial.find("kft").is_none());
}
