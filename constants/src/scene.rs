use bevy::color::Color;

/// Number of composited scene slots.
pub const SLOT_COUNT: usize = 4;

/// Points per particle layer.
pub const PARTICLE_COUNT: usize = 10_000;

/// Particles are scattered uniformly inside a cube of this half extent.
pub const PARTICLE_SPREAD: f32 = 1000.0;

/// Scale from elapsed seconds to the particle animation clock.
pub const PARTICLE_TIME_SCALE: f32 = 0.005;

/// One particle layer: base hue, saturation and lightness (all in 0..1).
pub struct ParticleLayer {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

/// Exponential-squared distance fog.
pub struct ParticleFog {
    pub colour: Color,
    pub density: f32,
}

pub struct ParticleScene {
    pub background: Color,
    pub fog: Option<ParticleFog>,
    pub seed: u32,
    pub layers: &'static [ParticleLayer],
}

const WARM_LAYERS: &[ParticleLayer] = &[
    ParticleLayer { hue: 1.0, saturation: 0.2, lightness: 0.5 },
    ParticleLayer { hue: 0.95, saturation: 0.1, lightness: 0.5 },
    ParticleLayer { hue: 0.90, saturation: 0.05, lightness: 0.5 },
    ParticleLayer { hue: 0.85, saturation: 0.0, lightness: 0.5 },
    ParticleLayer { hue: 0.80, saturation: 0.0, lightness: 0.5 },
];

const COOL_LAYERS: &[ParticleLayer] = &[
    ParticleLayer { hue: 0.55, saturation: 0.6, lightness: 0.6 },
    ParticleLayer { hue: 0.60, saturation: 0.5, lightness: 0.55 },
    ParticleLayer { hue: 0.65, saturation: 0.4, lightness: 0.5 },
    ParticleLayer { hue: 0.70, saturation: 0.3, lightness: 0.5 },
];

const EMBER_LAYERS: &[ParticleLayer] = &[
    ParticleLayer { hue: 0.05, saturation: 0.8, lightness: 0.55 },
    ParticleLayer { hue: 0.08, saturation: 0.7, lightness: 0.5 },
    ParticleLayer { hue: 0.12, saturation: 0.6, lightness: 0.5 },
];

/// Particle scenes for slots 1, 2 and 3.
pub const PARTICLE_SCENES: [ParticleScene; 3] = [
    ParticleScene {
        background: Color::srgb(0.102, 0.102, 0.102),
        fog: Some(ParticleFog {
            colour: Color::WHITE,
            density: 0.01,
        }),
        seed: 0x1A2B_3C4D,
        layers: WARM_LAYERS,
    },
    ParticleScene {
        background: Color::srgb(0.02, 0.03, 0.08),
        fog: None,
        seed: 0x5EED_0002,
        layers: COOL_LAYERS,
    },
    ParticleScene {
        background: Color::srgb(0.06, 0.02, 0.02),
        fog: None,
        seed: 0x5EED_0003,
        layers: EMBER_LAYERS,
    },
];

/// Walkthrough background (0x005500).
pub const WALKTHROUGH_BACKGROUND: Color = Color::srgb(0.0, 0.333, 0.0);

pub const WALKTHROUGH_AMBIENT_BRIGHTNESS: f32 = 500.0;
pub const WALKTHROUGH_SUN_ILLUMINANCE: f32 = 10_000.0;
