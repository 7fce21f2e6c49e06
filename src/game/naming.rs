use rand::Rng;
use rand_chacha::ChaCha8Rng;

const SYSTEM_PREFIXES: &[&str] = &[
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
    "Lambda", "Mu", "Nu", "Xi", "Omicron", "Pi", "Rho", "Sigma", "Tau", "Upsilon", "Phi", "Chi",
    "Psi", "Omega",
];
const SYSTEM_SUFFIXES: &[&str] = &[
    "Centauri", "Cygni", "Draconis", "Eridani", "Hydri", "Leonis", "Orionis", "Persei", "Tauri",
    "Ursae", "Virginis", "Serpentis", "Aquilae", "Lyrae",
];

const PLANET_PREFIXES: &[&str] = &[
    "New", "Old", "Great", "Lesser", "Upper", "Lower", "Inner", "Outer", "Northern", "Southern",
    "Eastern", "Western", "Central", "Prime",
];
const PLANET_SUFFIXES: &[&str] = &[
    "Terra", "Gaia", "Ares", "Cytherea", "Zephyr", "Kronos", "Caelus", "Nereus", "Hades",
    "Hermes", "Demeter", "Discordia", "Haumea", "Makemake", "Sedna",
];

const SYSTEM_PAIR_CHANCE: f64 = 0.7;
const PLANET_PAIR_CHANCE: f64 = 0.6;

fn pick<'a>(rng: &mut ChaCha8Rng, options: &'a [&str]) -> &'a str {
    let idx = rng.gen_range(0..options.len());
    options[idx]
}

/// "Sigma Draconis" most of the time, otherwise a catalogue name like "Sigma-417".
pub fn generate_system_name(rng: &mut ChaCha8Rng) -> String {
    if rng.gen::<f64>() < SYSTEM_PAIR_CHANCE {
        format!("{} {}", pick(rng, SYSTEM_PREFIXES), pick(rng, SYSTEM_SUFFIXES))
    } else {
        format!("{}-{}", pick(rng, SYSTEM_PREFIXES), rng.gen_range(1..=999))
    }
}

/// "Outer Terra" most of the time, otherwise a numbered name like "Sedna 4".
pub fn generate_planet_name(rng: &mut ChaCha8Rng) -> String {
    if rng.gen::<f64>() < PLANET_PAIR_CHANCE {
        format!("{} {}", pick(rng, PLANET_PREFIXES), pick(rng, PLANET_SUFFIXES))
    } else {
        format!("{} {}", pick(rng, PLANET_SUFFIXES), rng.gen_range(1..=9))
    }
}

/// First of `base`, `base 2`, `base 3`, ... not rejected by `taken`.
pub fn disambiguate(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{base} {n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
