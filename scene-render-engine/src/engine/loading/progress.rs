use bevy::prelude::*;

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub manifest_loaded: bool,
    pub experience_applied: bool,
    pub model_attached: bool,
}

impl LoadingProgress {
    /// The model is allowed to arrive after the app is running.
    pub fn ready_to_run(&self) -> bool {
        self.manifest_loaded && self.experience_applied
    }
}
