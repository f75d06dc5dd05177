/// Experience manifest, relative to the asset root.
pub const EXPERIENCE_MANIFEST_PATH: &str = "experience/manifest.json";

/// Walkthrough model used when the manifest cannot be loaded.
pub const DEFAULT_WALKTHROUGH_MODEL: &str = "models/v5.glb";

/// Logo shown behind the first particle scene.
pub const LOGO_TEXTURE_PATH: &str = "textures/logo-vert.png";
