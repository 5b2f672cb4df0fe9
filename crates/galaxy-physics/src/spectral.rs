//! Spectral classes and the weighted star-type sampler

use crate::error::{ConfigError, Result};
use crate::random::RandomSource;
use glam::Vec3;
use rand::Rng;

/// One row of the spectral table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralClass {
    /// Harvard class letter
    pub name: &'static str,
    /// Display tint, linear RGB in [0, 1]
    pub color: Vec3,
    /// Relative size factor, growing toward the hot end
    pub size_multiplier: f32,
    /// Relative population weight, drawn against a uniform value in [0, 100]
    pub frequency: f32,
}

const fn rgb8(r: u8, g: u8, b: u8) -> Vec3 {
    Vec3::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Main-sequence classes from cool/red (most common) to hot/blue (rarest).
pub const MAIN_SEQUENCE: [SpectralClass; 6] = [
    SpectralClass {
        name: "M",
        color: rgb8(0xff, 0xcc, 0x6f),
        size_multiplier: 2.0,
        frequency: 76.45,
    },
    SpectralClass {
        name: "K",
        color: rgb8(0xff, 0xd2, 0xa1),
        size_multiplier: 2.0,
        frequency: 12.1,
    },
    SpectralClass {
        name: "G",
        color: rgb8(0xff, 0xf4, 0xea),
        size_multiplier: 2.0,
        frequency: 7.6,
    },
    SpectralClass {
        name: "F",
        color: rgb8(0xf8, 0xf7, 0xff),
        size_multiplier: 2.0,
        frequency: 3.0,
    },
    SpectralClass {
        name: "A",
        color: rgb8(0xca, 0xd7, 0xff),
        size_multiplier: 2.5,
        frequency: 0.6,
    },
    SpectralClass {
        name: "B",
        color: rgb8(0xaa, 0xbf, 0xff),
        size_multiplier: 3.5,
        frequency: 0.13,
    },
];

/// Ordered, non-empty list of spectral classes.
///
/// Order matters to the sampler: the uniform draw is decremented entry by
/// entry, and the last entry absorbs whatever the weights leave uncovered.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralTable {
    classes: Vec<SpectralClass>,
}

impl SpectralTable {
    pub fn new(classes: Vec<SpectralClass>) -> Result<Self> {
        if classes.is_empty() {
            return Err(ConfigError::EmptySpectralTable);
        }
        for (index, class) in classes.iter().enumerate() {
            if !class.frequency.is_finite() || class.frequency < 0.0 {
                return Err(ConfigError::InvalidFrequency {
                    index,
                    weight: class.frequency,
                });
            }
        }
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[SpectralClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SpectralClass> {
        self.classes.get(index)
    }

    /// Sum of all frequency weights (99.88 for the default table)
    pub fn total_frequency(&self) -> f32 {
        self.classes.iter().map(|c| c.frequency).sum()
    }

    /// Walk the table with a draw in [0, 100]. Falls back to the last index
    /// when the draw is past the cumulative weight.
    pub fn index_for_draw(&self, draw: f32) -> usize {
        let mut remaining = draw;
        for (i, class) in self.classes.iter().enumerate() {
            if (0.0..=class.frequency).contains(&remaining) {
                return i;
            }
            remaining -= class.frequency;
        }
        self.classes.len() - 1
    }
}

impl Default for SpectralTable {
    fn default() -> Self {
        Self {
            classes: MAIN_SEQUENCE.to_vec(),
        }
    }
}

/// Visual radius for a spectral type index. Rarer (hotter) classes sit at
/// higher indices and render larger.
pub fn radius_for_type(type_index: usize) -> f32 {
    ((type_index + 1) as f32).sqrt()
}

/// Stateless sampler over a spectral table
#[derive(Debug, Clone, Default)]
pub struct StarClassifier {
    table: SpectralTable,
}

impl StarClassifier {
    pub fn new(table: SpectralTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SpectralTable {
        &self.table
    }

    /// Draw a spectral type index
    pub fn sample<R: Rng>(&self, random: &mut RandomSource<R>) -> usize {
        let draw = random.uniform(0.0, 100.0);
        self.table.index_for_draw(draw)
    }

    /// Unit-length base color for a type index, alpha 1
    pub fn base_color(&self, type_index: usize) -> [f32; 4] {
        let color = self
            .table
            .get(type_index)
            .map(|c| c.color.normalize_or_zero())
            .unwrap_or(Vec3::ONE.normalize());
        color.extend(1.0).to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(
            SpectralTable::new(Vec::new()),
            Err(ConfigError::EmptySpectralTable)
        );
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut classes = MAIN_SEQUENCE.to_vec();
        classes[2].frequency = -1.0;
        assert!(matches!(
            SpectralTable::new(classes),
            Err(ConfigError::InvalidFrequency { index: 2, .. })
        ));
    }

    #[test]
    fn test_index_for_draw_boundaries() {
        let table = SpectralTable::default();
        assert_eq!(table.index_for_draw(0.0), 0);
        assert_eq!(table.index_for_draw(76.45), 0);
        assert_eq!(table.index_for_draw(76.5), 1);
        assert_eq!(table.index_for_draw(88.5), 1);
        assert_eq!(table.index_for_draw(90.0), 2);
        // Past the cumulative 99.88 falls back to the last class
        assert_eq!(table.index_for_draw(99.95), 5);
        assert_eq!(table.index_for_draw(100.0), 5);
    }

    #[test]
    fn test_degenerate_weights_fall_back_to_last() {
        let mut classes = MAIN_SEQUENCE.to_vec();
        for c in &mut classes {
            c.frequency = 0.0;
        }
        let table = SpectralTable::new(classes).unwrap();
        assert_eq!(table.index_for_draw(0.0), 0);
        assert_eq!(table.index_for_draw(50.0), 5);
    }

    #[test]
    fn test_size_grows_toward_hot_end() {
        let sizes: Vec<f32> = MAIN_SEQUENCE.iter().map(|c| c.size_multiplier).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert!(radius_for_type(5) > radius_for_type(0));
        assert_eq!(radius_for_type(3), 2.0);
    }

    #[test]
    fn test_base_color_is_unit_length() {
        let classifier = StarClassifier::default();
        for i in 0..classifier.table().len() {
            let c = classifier.base_color(i);
            let len = Vec3::new(c[0], c[1], c[2]).length();
            assert!((len - 1.0).abs() < 1e-5);
            assert_eq!(c[3], 1.0);
        }
    }
}
