//! Unit tests for evaluation semantics, driven through the engine.

use dim_expr::{Engine, Error};

fn eval(engine: &mut Engine, src: &str) -> String {
    engine
        .eval(src)
        .unwrap_or_else(|e| panic!("eval failed for {src:?}: {e}"))
}

fn eval_err(engine: &mut Engine, src: &str) -> Error {
    engine
        .eval(src)
        .err()
        .unwrap_or_else(|| panic!("expected error for {src:?}"))
}

#[test]
fn addition_preserves_left_display_unit() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "2 m + 3 m"), "5 m");
    assert_eq!(eval(&mut engine, "1 km + 500 m"), "1.5 km");
}

#[test]
fn addition_requires_matching_dimensions() {
    let mut engine = Engine::new();
    assert!(matches!(
        eval_err(&mut engine, "2 m + 3 s"),
        Error::InvalidOperands(_)
    ));
    assert!(matches!(
        eval_err(&mut engine, "2 m + 3"),
        Error::InvalidOperands(_)
    ));
}

#[test]
fn multiplication_composes_dimensions() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "2 m * 3 m"), "6 m^2");
    assert_eq!(eval(&mut engine, "5 m / 2 s"), "2.5 m/s");
}

#[test]
fn scalar_quantity_products_keep_the_unit() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "3 * 2 m"), "6 m");
    assert_eq!(eval(&mut engine, "6 m / 2"), "3 m");
}

#[test]
fn number_divided_by_quantity_is_rejected() {
    let mut engine = Engine::new();
    assert!(matches!(
        eval_err(&mut engine, "6 / 2 m"),
        Error::InvalidOperands(_)
    ));
}

#[test]
fn division_by_zero() {
    let mut engine = Engine::new();
    assert_eq!(eval_err(&mut engine, "1 / 0"), Error::DivisionByZero);
    assert_eq!(eval_err(&mut engine, "1 m / 0 s"), Error::DivisionByZero);
    assert_eq!(eval_err(&mut engine, "1 m / 0"), Error::DivisionByZero);
}

#[test]
fn power_on_quantities() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "(2 m)^2"), "4 m^2");
    assert_eq!(eval(&mut engine, "(16 m^2)^0.5"), "4 m");
    assert_eq!(eval(&mut engine, "2^10"), "1024");
}

#[test]
fn fractional_power_must_yield_integer_dimensions() {
    let mut engine = Engine::new();
    assert_eq!(eval_err(&mut engine, "(1 m)^0.5"), Error::NonIntegerDim);
}

#[test]
fn affine_units_apply_only_to_bare_symbols() {
    let mut engine = Engine::new();
    // 10 C is an absolute temperature: 283.15 K canonically.
    assert_eq!(eval(&mut engine, "10 C as K"), "283.150 K");
    // At any other exponent the offset is ignored.
    assert_eq!(eval(&mut engine, "10 C^2 as K^2"), "10.000 K^2");
}

#[test]
fn temperature_difference_is_a_delta() {
    let mut engine = Engine::new();
    let out = eval(&mut engine, "30 C - 10 C");
    assert!(out.starts_with('\u{394}'), "expected delta prefix: {out}");
    assert!(out.ends_with(" C"), "{out}");

    // A delta converts multiplicatively: 20 K of increment is 36 F of
    // increment, not an absolute Fahrenheit reading.
    let out = eval(&mut engine, "(30 C - 10 C) as F");
    assert!(out.starts_with('\u{394}'), "{out}");
    let magnitude: f64 = out
        .trim_start_matches('\u{394}')
        .trim_end_matches(" F")
        .parse()
        .unwrap();
    assert!((magnitude - 36.0).abs() < 1e-6, "{out}");
}

#[test]
fn comparisons_use_canonical_values() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "2 m > 100 cm"), "true");
    assert_eq!(eval(&mut engine, "1 h <= 3600 s"), "true");
    assert_eq!(eval(&mut engine, "3 > 4"), "false");
    assert!(matches!(
        eval_err(&mut engine, "1 m < 1 s"),
        Error::InvalidOperands(_)
    ));
}

#[test]
fn equality_is_per_variant() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "1000 m == 1 km"), "true");
    assert_eq!(eval(&mut engine, "2 m == 3 m"), "false");
    assert_eq!(eval(&mut engine, "2 == 2"), "true");
    // Mismatched kinds compare unequal rather than erroring.
    assert_eq!(eval(&mut engine, "2 == 2 m"), "false");
}

#[test]
fn truthiness_and_not() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "!1"), "false");
    assert_eq!(eval(&mut engine, "!0"), "true");
    assert_eq!(eval(&mut engine, "!0 m"), "true");
    assert_eq!(eval(&mut engine, "!!2 m"), "true");
}

#[test]
fn auto_mode_rescales_with_si_prefixes() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "5000 m as m"), "5.000 km");
    assert_eq!(eval(&mut engine, "0.05 m as m"), "5.000 cm");
    // An explicit mode leaves the symbol alone.
    assert_eq!(eval(&mut engine, "5000 m as m:none"), "5000 m");
}

#[test]
fn display_requires_a_quantity_and_matching_dimension() {
    let mut engine = Engine::new();
    assert!(matches!(
        eval_err(&mut engine, "2 as m"),
        Error::InvalidOperand(_)
    ));
    assert!(matches!(
        eval_err(&mut engine, "2 m as s"),
        Error::InvalidOperands(_)
    ));
}

#[test]
fn unknown_symbols_are_undefined_variables() {
    let mut engine = Engine::new();
    assert!(matches!(
        eval_err(&mut engine, "2 blorp"),
        Error::UndefinedVariable(_)
    ));
}

#[test]
fn assignment_defines_and_returns_the_quantity() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "d = (24 h)"), "24 h");
    assert_eq!(eval(&mut engine, "2 d as h"), "48.000 h");

    // Non-quantity right-hand sides fail and leave the table unchanged.
    assert!(matches!(
        eval_err(&mut engine, "x = (1 < 2)"),
        Error::InvalidOperand(_)
    ));
    assert!(matches!(
        eval_err(&mut engine, "1 x"),
        Error::UndefinedVariable(_)
    ));
}

#[test]
fn constants_shadow_builtin_units() {
    let mut engine = Engine::new();
    // A session constant named `h` wins over the SI hour.
    eval(&mut engine, "h = (7200 s)");
    assert_eq!(eval(&mut engine, "1 h as min"), "120.000 min");
}

#[test]
fn commands_manage_the_constants_table() {
    let mut engine = Engine::new();
    assert_eq!(eval(&mut engine, "list"), "");

    eval(&mut engine, "d = (24 h)");
    let listing = eval(&mut engine, "list");
    assert_eq!(listing, "d: dim [0 0 1 0 0 0 0], 1 d = 86400 s");
    assert_eq!(eval(&mut engine, "show d"), listing);

    assert_eq!(eval(&mut engine, "clear d"), "ok");
    assert!(matches!(
        eval_err(&mut engine, "show d"),
        Error::UndefinedVariable(_)
    ));

    eval(&mut engine, "a = (1 m)");
    eval(&mut engine, "b = (2 m)");
    assert_eq!(eval(&mut engine, "clear all"), "ok");
    assert_eq!(eval(&mut engine, "list"), "");
}

#[test]
fn define_rewrites_to_an_assignment() {
    let mut engine = Engine::new();
    engine.define("wk", "7 * 24 h").unwrap();
    assert_eq!(eval(&mut engine, "1 wk as h"), "168.000 h");

    engine.clear("wk");
    assert!(matches!(
        eval_err(&mut engine, "1 wk"),
        Error::UndefinedVariable(_)
    ));
}

#[test]
fn lex_errors_abort_with_line_tag() {
    let mut engine = Engine::new();
    let err = eval_err(&mut engine, "2 @ 2");
    assert!(matches!(err, Error::Lex { line: 1, .. }));
    assert!(err.report().starts_with("[line 1] Error"));
}

#[test]
fn runtime_errors_render_with_prefix() {
    let mut engine = Engine::new();
    let err = eval_err(&mut engine, "1 / 0");
    assert_eq!(err.report(), "Runtime error: division by zero");
}
