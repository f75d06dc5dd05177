use bevy::prelude::*;
use constants::path::DEFAULT_WALKTHROUGH_MODEL;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

const DEFAULT_ENVIRONMENT_INTENSITY: f32 = 900.0;

/// Configuration problems found while binding the manifest. None of them are fatal.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("point of interest '{id}' targets missing overlay element '{selector}'")]
    MissingOverlayTarget { id: String, selector: String },
    #[error("point of interest id '{0}' is declared more than once")]
    DuplicatePointOfInterest(String),
}

/// Image-based lighting for the walkthrough, as a pair of cubemaps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentConfig {
    pub diffuse_map: String,
    pub specular_map: String,
    #[serde(default = "default_environment_intensity")]
    pub intensity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalkthroughConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentConfig>,
    /// Model meshes join the ground probe's collidable set.
    #[serde(default)]
    pub collidable_model: bool,
}

impl Default for WalkthroughConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            environment: None,
            collidable_model: false,
        }
    }
}

/// Screen-space overlay element a point of interest positions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayElement {
    pub selector: String,
    pub label: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointOfInterestConfig {
    pub id: String,
    pub selector: String,
    pub position: [f32; 3],
}

impl PointOfInterestConfig {
    pub fn world_position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Experience manifest as a Bevy asset. Mirrors the JSON structure.
#[derive(Asset, Debug, Clone, Default, Serialize, Deserialize, TypePath, Resource)]
pub struct ExperienceManifest {
    #[serde(default)]
    pub walkthrough: WalkthroughConfig,
    #[serde(default)]
    pub overlays: Vec<OverlayElement>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterestConfig>,
}

/// A point of interest paired with the overlay element it drives.
#[derive(Debug, Clone, Copy)]
pub struct BoundPoint<'a> {
    pub point: &'a PointOfInterestConfig,
    pub overlay: &'a OverlayElement,
}

impl ExperienceManifest {
    pub fn overlay(&self, selector: &str) -> Option<&OverlayElement> {
        self.overlays
            .iter()
            .find(|overlay| overlay.selector == selector)
    }

    /// Bind every point of interest to its overlay element.
    /// Fails on the first missing target or duplicate id.
    pub fn bound_points(&self) -> Result<Vec<BoundPoint<'_>>, ConfigError> {
        let mut seen = HashSet::new();

        self.points_of_interest
            .iter()
            .map(|point| {
                if !seen.insert(point.id.as_str()) {
                    return Err(ConfigError::DuplicatePointOfInterest(point.id.clone()));
                }
                let overlay = self.overlay(&point.selector).ok_or_else(|| {
                    ConfigError::MissingOverlayTarget {
                        id: point.id.clone(),
                        selector: point.selector.clone(),
                    }
                })?;
                Ok(BoundPoint { point, overlay })
            })
            .collect()
    }
}

fn default_model() -> String {
    DEFAULT_WALKTHROUGH_MODEL.to_string()
}

fn default_environment_intensity() -> f32 {
    DEFAULT_ENVIRONMENT_INTENSITY
}
