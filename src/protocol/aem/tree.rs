//! The entity's descriptor tree.

use std::collections::BTreeMap;

use super::descriptor::{Descriptor, DescriptorType, EntityDescriptor};

/// Violations of the descriptor tree invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No ENTITY descriptor at index 0.
    #[error("descriptor tree has no ENTITY descriptor at index 0")]
    MissingEntity,

    /// A required descriptor kind is absent.
    #[error("descriptor tree has no {0} descriptor")]
    Missing(DescriptorType),

    /// Indices of a type do not run 0..n.
    #[error("{descriptor_type} indices are not contiguous: missing index {missing}")]
    NonContiguous {
        /// Offending type.
        descriptor_type: DescriptorType,
        /// First missing index.
        missing: u16,
    },

    /// A configuration counts more descriptors than the tree holds.
    #[error(
        "configuration {configuration} lists {listed} {descriptor_type} descriptors, tree has {present}"
    )]
    CountMismatch {
        /// Configuration index.
        configuration: u16,
        /// Counted type.
        descriptor_type: DescriptorType,
        /// Count in the configuration's table.
        listed: u16,
        /// Descriptors present in the tree.
        present: u16,
    },

    /// ENTITY descriptor disagrees with the number of configurations.
    #[error("entity reports {reported} configurations (current {current}), tree has {present}")]
    ConfigurationCount {
        /// `configurations_count` in the ENTITY descriptor.
        reported: u16,
        /// `current_configuration` in the ENTITY descriptor.
        current: u16,
        /// CONFIGURATION descriptors present.
        present: u16,
    },
}

/// Descriptors keyed by `(descriptor_type, descriptor_index)`.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorTree {
    descriptors: BTreeMap<(DescriptorType, u16), Descriptor>,
}

impl DescriptorTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, replacing any with the same key.
    pub fn insert(&mut self, descriptor: Descriptor) -> Option<Descriptor> {
        let key = (descriptor.descriptor_type(), descriptor.descriptor_index());
        self.descriptors.insert(key, descriptor)
    }

    /// Look up a descriptor.
    #[must_use]
    pub fn get(&self, descriptor_type: DescriptorType, index: u16) -> Option<&Descriptor> {
        self.descriptors.get(&(descriptor_type, index))
    }

    /// The ENTITY descriptor.
    #[must_use]
    pub fn entity(&self) -> Option<&EntityDescriptor> {
        match self.get(DescriptorType::ENTITY, 0) {
            Some(Descriptor::Entity(entity)) => Some(entity),
            _ => None,
        }
    }

    /// Number of descriptors of `descriptor_type`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn count(&self, descriptor_type: DescriptorType) -> u16 {
        self.descriptors
            .range((descriptor_type, 0)..=(descriptor_type, u16::MAX))
            .count() as u16
    }

    /// Total number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in `(type, index)` order.
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.values()
    }

    /// Check the structural invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`TreeError`] found.
    pub fn validate(&self) -> Result<(), TreeError> {
        let entity = self.entity().ok_or(TreeError::MissingEntity)?;

        for required in [DescriptorType::CONFIGURATION, DescriptorType::AVB_INTERFACE] {
            if self.count(required) == 0 {
                return Err(TreeError::Missing(required));
            }
        }

        let mut types: Vec<DescriptorType> = self.descriptors.keys().map(|(t, _)| *t).collect();
        types.dedup();
        for descriptor_type in types {
            let indices = self
                .descriptors
                .range((descriptor_type, 0)..=(descriptor_type, u16::MAX))
                .map(|((_, index), _)| *index);
            for (expected, index) in (0u16..).zip(indices) {
                if index != expected {
                    return Err(TreeError::NonContiguous {
                        descriptor_type,
                        missing: expected,
                    });
                }
            }
        }

        let configurations = self.count(DescriptorType::CONFIGURATION);
        if entity.configurations_count != configurations
            || entity.current_configuration >= configurations
        {
            return Err(TreeError::ConfigurationCount {
                reported: entity.configurations_count,
                current: entity.current_configuration,
                present: configurations,
            });
        }

        for descriptor in self.iter() {
            let Descriptor::Configuration(configuration) = descriptor else {
                continue;
            };
            for row in &configuration.descriptor_counts {
                let present = self.count(row.descriptor_type);
                if row.count > present {
                    return Err(TreeError::CountMismatch {
                        configuration: configuration.descriptor_index,
                        descriptor_type: row.descriptor_type,
                        listed: row.count,
                        present,
                    });
                }
            }
        }

        Ok(())
    }
}
