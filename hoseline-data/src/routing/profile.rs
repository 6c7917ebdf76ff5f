//! Transport mode to OSRM profile mapping.

use hoseline_core::TransportMode;

/// The single place where transport modes become OSRM profile names.
///
/// Defaults follow the stock OSRM profiles plus a dedicated profile for
/// service-way driving. Deployments with differently named profiles override
/// entries with [`ProfileTable::with_profile`].
///
/// # Examples
/// ```
/// use hoseline_core::TransportMode;
/// use hoseline_data::ProfileTable;
///
/// let table = ProfileTable::default();
/// assert_eq!(table.profile(TransportMode::Walking), "foot");
/// assert_eq!(table.profile(TransportMode::ServiceDriving), "driving-service");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileTable {
    walking: String,
    driving: String,
    cycling: String,
    service_driving: String,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            walking: "foot".to_owned(),
            driving: "driving".to_owned(),
            cycling: "bike".to_owned(),
            service_driving: "driving-service".to_owned(),
        }
    }
}

impl ProfileTable {
    /// Profile used for `mode`.
    pub fn profile(&self, mode: TransportMode) -> &str {
        match mode {
            TransportMode::Walking => &self.walking,
            TransportMode::Driving => &self.driving,
            TransportMode::Cycling => &self.cycling,
            TransportMode::ServiceDriving => &self.service_driving,
        }
    }

    /// Route `mode` through `profile` instead of the default.
    #[must_use]
    pub fn with_profile(mut self, mode: TransportMode, profile: impl Into<String>) -> Self {
        let slot = match mode {
            TransportMode::Walking => &mut self.walking,
            TransportMode::Driving => &mut self.driving,
            TransportMode::Cycling => &mut self.cycling,
            TransportMode::ServiceDriving => &mut self.service_driving,
        };
        *slot = profile.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TransportMode::Walking, "foot")]
    #[case(TransportMode::Driving, "driving")]
    #[case(TransportMode::Cycling, "bike")]
    #[case(TransportMode::ServiceDriving, "driving-service")]
    fn default_profiles(#[case] mode: TransportMode, #[case] expected: &str) {
        assert_eq!(ProfileTable::default().profile(mode), expected);
    }

    #[rstest]
    fn overrides_replace_one_entry() {
        let table = ProfileTable::default().with_profile(TransportMode::Cycling, "bicycle");
        assert_eq!(table.profile(TransportMode::Cycling), "bicycle");
        assert_eq!(table.profile(TransportMode::Walking), "foot");
    }
}
