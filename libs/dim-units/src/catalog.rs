//! Built-in unit catalogues.
//!
//! Four registries are populated at first use and live for the process:
//! SI, Imperial, CGS and Industrial. The lookup order across them is fixed
//! and part of the engine contract.

use crate::dimension::Dimension;
use crate::registry::Registry;
use once_cell::sync::Lazy;

const VELOCITY: Dimension = Dimension([1, 0, -1, 0, 0, 0, 0]);
const ACCELERATION: Dimension = Dimension([1, 0, -2, 0, 0, 0, 0]);
const AREA: Dimension = Dimension([2, 0, 0, 0, 0, 0, 0]);
const VOLUME: Dimension = Dimension([3, 0, 0, 0, 0, 0, 0]);
const FREQUENCY: Dimension = Dimension([0, 0, -1, 0, 0, 0, 0]);
const FORCE: Dimension = Dimension([1, 1, -2, 0, 0, 0, 0]);
const PRESSURE: Dimension = Dimension([-1, 1, -2, 0, 0, 0, 0]);
const ENERGY: Dimension = Dimension([2, 1, -2, 0, 0, 0, 0]);
const POWER: Dimension = Dimension([2, 1, -3, 0, 0, 0, 0]);
const VISCOSITY: Dimension = Dimension([-1, 1, -1, 0, 0, 0, 0]);
const KINEMATIC_VISCOSITY: Dimension = Dimension([2, 0, -1, 0, 0, 0, 0]);

static BUILTIN: Lazy<Vec<Registry>> = Lazy::new(|| vec![si(), imperial(), cgs(), industrial()]);

/// The built-in registries in engine lookup order.
pub fn builtin() -> &'static [Registry] {
    &BUILTIN
}

/// The SI registry; also the target system for normalization.
pub fn si_registry() -> &'static Registry {
    &BUILTIN[0]
}

fn si() -> Registry {
    let mut r = Registry::new("SI");

    // Base units. The canonical mass unit is the kilogram, so the gram
    // carries a 1e-3 scale and `kg` is present as an exact scale-1 symbol.
    r.unit("m", Dimension::LENGTH, 1.0);
    r.unit("kg", Dimension::MASS, 1.0);
    r.unit("g", Dimension::MASS, 1e-3);
    r.unit("s", Dimension::TIME, 1.0);
    r.unit("A", Dimension::CURRENT, 1.0);
    r.unit("K", Dimension::TEMPERATURE, 1.0);
    r.unit("mol", Dimension::AMOUNT, 1.0);
    r.unit("cd", Dimension::LUMINOSITY, 1.0);

    // Named derived units.
    r.unit("Hz", FREQUENCY, 1.0);
    r.unit("N", FORCE, 1.0);
    r.unit("Pa", PRESSURE, 1.0);
    r.unit("J", ENERGY, 1.0);
    r.unit("W", POWER, 1.0);

    // Compound symbols the normalizer may emit; they are not reachable
    // from the lexer (the glyphs split into several tokens) but they make
    // common derived dimensions print without residual base units.
    r.unit("m/s", VELOCITY, 1.0);
    r.unit("m/s^2", ACCELERATION, 1.0);
    r.unit("m^2", AREA, 1.0);
    r.unit("m^3", VOLUME, 1.0);

    // Accepted non-coherent units.
    r.unit("L", VOLUME, 1e-3);
    r.unit("min", Dimension::TIME, 60.0);
    r.unit("h", Dimension::TIME, 3600.0);

    r.affine_unit("C", Dimension::TEMPERATURE, 1.0, 273.15);

    // Long names. `kilogram` precedes `gram` so the mass dimension
    // normalizes to the canonical `kg`.
    r.alias("meter", "m");
    r.alias("metre", "m");
    r.alias("kilogram", "kg");
    r.alias("gram", "g");
    r.alias("second", "s");
    r.alias("sec", "s");
    r.alias("amp", "A");
    r.alias("ampere", "A");
    r.alias("kelvin", "K");
    r.alias("mole", "mol");
    r.alias("candela", "cd");
    r.alias("hertz", "Hz");
    r.alias("Newton", "N");
    r.alias("newton", "N");
    r.alias("Pascal", "Pa");
    r.alias("pascal", "Pa");
    r.alias("Joule", "J");
    r.alias("joule", "J");
    r.alias("Watt", "W");
    r.alias("watt", "W");
    r.alias("liter", "L");
    r.alias("litre", "L");
    r.alias("minute", "min");
    r.alias("hour", "h");
    r.alias("degC", "C");
    r.alias("celsius", "C");

    r.prefix("p", 1e-12);
    r.prefix("n", 1e-9);
    r.prefix("u", 1e-6);
    r.prefix("\u{b5}", 1e-6); // µ
    r.prefix("m", 1e-3);
    r.prefix("c", 1e-2);
    r.prefix("d", 1e-1);
    r.prefix("da", 1e1);
    r.prefix("h", 1e2);
    r.prefix("k", 1e3);
    r.prefix("M", 1e6);
    r.prefix("G", 1e9);
    r.prefix("T", 1e12);

    r
}

fn imperial() -> Registry {
    let mut r = Registry::new("Imperial");

    r.unit("in", Dimension::LENGTH, 0.0254);
    r.unit("ft", Dimension::LENGTH, 0.3048);
    r.unit("yd", Dimension::LENGTH, 0.9144);
    r.unit("mi", Dimension::LENGTH, 1609.344);
    r.unit("lb", Dimension::MASS, 0.453_592_37);
    r.unit("oz", Dimension::MASS, 0.028_349_523_125);
    r.unit("gal", VOLUME, 0.003_785_411_784);
    r.unit("mph", VELOCITY, 0.447_04);
    r.affine_unit("F", Dimension::TEMPERATURE, 5.0 / 9.0, 459.67);

    r.alias("inch", "in");
    r.alias("foot", "ft");
    r.alias("feet", "ft");
    r.alias("yard", "yd");
    r.alias("mile", "mi");
    r.alias("pound", "lb");
    r.alias("ounce", "oz");
    r.alias("gallon", "gal");
    r.alias("degF", "F");
    r.alias("fahrenheit", "F");

    r
}

fn cgs() -> Registry {
    let mut r = Registry::new("CGS");

    r.unit("dyn", FORCE, 1e-5);
    r.unit("erg", ENERGY, 1e-7);
    r.unit("Ba", PRESSURE, 0.1);
    r.unit("P", VISCOSITY, 0.1);
    r.unit("St", KINEMATIC_VISCOSITY, 1e-4);
    r.unit("Gal", ACCELERATION, 0.01);

    r.alias("dyne", "dyn");
    r.alias("barye", "Ba");
    r.alias("poise", "P");
    r.alias("stokes", "St");
    r.alias("galileo", "Gal");

    r
}

fn industrial() -> Registry {
    let mut r = Registry::new("Industrial");

    r.unit("bar", PRESSURE, 1e5);
    r.unit("atm", PRESSURE, 101_325.0);
    r.unit("psi", PRESSURE, 6_894.757_293_168);
    r.unit("torr", PRESSURE, 101_325.0 / 760.0);
    r.unit("mmHg", PRESSURE, 133.322_387_415);
    r.unit("hp", POWER, 745.699_871_582_270_2);
    r.unit("Wh", ENERGY, 3600.0);
    r.unit("t", Dimension::MASS, 1000.0);

    r.alias("atmosphere", "atm");
    r.alias("horsepower", "hp");
    r.alias("tonne", "t");

    r.prefix("m", 1e-3);
    r.prefix("k", 1e3);
    r.prefix("M", 1e6);
    r.prefix("G", 1e9);

    r
}
