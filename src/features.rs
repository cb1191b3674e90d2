//! Feature table shown on the analysis page.
//!
//! The six 0–1 scores are always listed in the same order, independent of how
//! the source record was laid out.

use serde::Serialize;

use crate::clients::entities::AudioFeatures;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Acousticness,
    Danceability,
    Energy,
    Liveness,
    Speechiness,
    Valence,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Acousticness,
        Feature::Danceability,
        Feature::Energy,
        Feature::Liveness,
        Feature::Speechiness,
        Feature::Valence,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Acousticness => "acousticness",
            Feature::Danceability => "danceability",
            Feature::Energy => "energy",
            Feature::Liveness => "liveness",
            Feature::Speechiness => "speechiness",
            Feature::Valence => "valence",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::Acousticness => "Acousticness",
            Feature::Danceability => "Danceability",
            Feature::Energy => "Energy",
            Feature::Liveness => "Liveness",
            Feature::Speechiness => "Speechiness",
            Feature::Valence => "Valence",
        }
    }

    pub fn value(self, features: &AudioFeatures) -> f64 {
        match self {
            Feature::Acousticness => features.acousticness,
            Feature::Danceability => features.danceability,
            Feature::Energy => features.energy,
            Feature::Liveness => features.liveness,
            Feature::Speechiness => features.speechiness,
            Feature::Valence => features.valence,
        }
    }

    /// What the score means, for the "What do these mean?" section
    pub fn description(self) -> &'static str {
        match self {
            Feature::Acousticness => {
                "A confidence measure from 0.0 to 1.0 of whether the track is acoustic. \
                 1.0 represents high confidence the track is acoustic."
            }
            Feature::Danceability => {
                "Describes how suitable a track is for dancing based on a combination of musical \
                 elements including tempo, rhythm stability, beat strength, and overall regularity. \
                 A value of 0.0 is least danceable and 1.0 is most danceable."
            }
            Feature::Energy => {
                "Measure from 0.0 to 1.0 and represents a perceptual measure of intensity and \
                 activity. Typically, energetic tracks feel fast, loud, and noisy. For example, \
                 death metal has high energy, while a Bach prelude scores low on the scale. \
                 Perceptual features contributing to this attribute include dynamic range, \
                 perceived loudness, timbre, onset rate, and general entropy."
            }
            Feature::Liveness => {
                "Detects the presence of an audience in the recording. Higher liveness values \
                 represent an increased probability that the track was performed live. \
                 A value above 0.8 provides strong likelihood that the track is live."
            }
            Feature::Speechiness => {
                "Detects the presence of spoken words in a track. The more exclusively speech-like \
                 the recording (e.g. talk show, audio book, poetry), the closer to 1.0 the attribute \
                 value. Values above 0.66 describe tracks that are probably made entirely of spoken \
                 words. Values between 0.33 and 0.66 describe tracks that may contain both music and \
                 speech. Values below 0.33 most likely represent music and other non-speech-like tracks."
            }
            Feature::Valence => {
                "A measure from 0.0 to 1.0 describing the musical positiveness conveyed by a track. \
                 Tracks with high valence sound more positive (e.g. happy, cheerful, euphoric), \
                 while tracks with low valence sound more negative (e.g. sad, depressed, angry)."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRow {
    pub feature: Feature,
    pub value: f64,
}

impl FeatureRow {
    /// Value clamped to the chart axis
    pub fn bar_length(&self) -> f64 {
        if self.value.is_nan() {
            0.0
        } else {
            self.value.clamp(AXIS_MIN, AXIS_MAX)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureTable {
    pub rows: Vec<FeatureRow>,
    pub tempo: f64,
}

impl FeatureTable {
    pub fn new(features: &AudioFeatures) -> Self {
        FeatureTable {
            rows: Feature::ALL
                .iter()
                .map(|&feature| FeatureRow {
                    feature,
                    value: feature.value(features),
                })
                .collect(),
            tempo: features.tempo,
        }
    }

    /// Tempo as shown next to the chart, e.g. `BPM: 92.5`
    pub fn bpm_label(&self) -> String {
        format!("BPM: {:.1}", self.tempo)
    }
}

pub const AXIS_MIN: f64 = 0.0;
pub const AXIS_MAX: f64 = 1.0;
pub const AXIS_STEP: f64 = 0.1;
pub const AXIS_TICK_COUNT: u32 = 11;

/// 0.0, 0.1, ..., 1.0
pub fn axis_ticks() -> Vec<f64> {
    (0..AXIS_TICK_COUNT)
        .map(|i| AXIS_MIN + AXIS_STEP * f64::from(i))
        .collect()
}
