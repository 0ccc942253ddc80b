//! Configuration validation.
//!
//! Validates every scoring setting before a batch runs. Keys that are absent
//! fall back to their defaults; keys that are present must parse.

use crate::domain::accumulator::DEFAULT_MIN_WEIGHT;
use crate::domain::error::SentraderError;
use crate::domain::message::MalformedLinePolicy;
use crate::domain::signal::Thresholds;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SentraderError> {
    validate_thresholds(&read_thresholds(config)?)?;
    read_min_weight(config)?;
    read_malformed_line_policy(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SentraderError {
    SentraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Reads a finite number, `default` when the key is absent.
fn read_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SentraderError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, format!("'{}' is not a number", raw.trim())))?;
    if !value.is_finite() {
        return Err(invalid(section, key, "must be finite"));
    }
    Ok(value)
}

pub fn read_thresholds(config: &dyn ConfigPort) -> Result<Thresholds, SentraderError> {
    let defaults = Thresholds::default();
    Ok(Thresholds {
        put_hard: read_number(config, "thresholds", "put_hard", defaults.put_hard)?,
        put_soft: read_number(config, "thresholds", "put_soft", defaults.put_soft)?,
        call_soft: read_number(config, "thresholds", "call_soft", defaults.call_soft)?,
        call_hard: read_number(config, "thresholds", "call_hard", defaults.call_hard)?,
    })
}

/// Bands must be ordered `put_hard <= put_soft < call_soft <= call_hard` so
/// that every finite score lands in exactly one of them.
pub fn validate_thresholds(t: &Thresholds) -> Result<(), SentraderError> {
    let values = [
        ("put_hard", t.put_hard),
        ("put_soft", t.put_soft),
        ("call_soft", t.call_soft),
        ("call_hard", t.call_hard),
    ];
    for (key, value) in values {
        if !value.is_finite() {
            return Err(invalid("thresholds", key, "must be finite"));
        }
    }
    if t.put_hard > t.put_soft {
        return Err(invalid(
            "thresholds",
            "put_hard",
            "put_hard must not exceed put_soft",
        ));
    }
    if t.put_soft >= t.call_soft {
        return Err(invalid(
            "thresholds",
            "put_soft",
            "put_soft must be below call_soft",
        ));
    }
    if t.call_soft > t.call_hard {
        return Err(invalid(
            "thresholds",
            "call_hard",
            "call_hard must not be below call_soft",
        ));
    }
    Ok(())
}

pub fn read_min_weight(config: &dyn ConfigPort) -> Result<f64, SentraderError> {
    let value = read_number(config, "scoring", "min_weight", DEFAULT_MIN_WEIGHT)?;
    if value <= 0.0 {
        return Err(invalid("scoring", "min_weight", "min_weight must be positive"));
    }
    Ok(value)
}

pub fn read_malformed_line_policy(
    config: &dyn ConfigPort,
) -> Result<MalformedLinePolicy, SentraderError> {
    match config.get_string("batch", "malformed_lines") {
        None => Ok(MalformedLinePolicy::default()),
        Some(raw) => raw
            .parse()
            .map_err(|reason: String| invalid("batch", "malformed_lines", reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: SentraderError) -> String {
        match err {
            SentraderError::ConfigInvalid { key, .. } => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(validate_config(&FileConfigAdapter::empty()).is_ok());
    }

    #[test]
    fn full_config_is_valid() {
        let c = config(
            "[thresholds]\nput_hard = -0.7\nput_soft = -0.3\ncall_soft = 0.3\ncall_hard = 0.7\n\
             [scoring]\nmin_weight = 0.01\n[batch]\nmalformed_lines = skip\n",
        );
        assert!(validate_config(&c).is_ok());
        assert_eq!(read_thresholds(&c).unwrap().call_hard, 0.7);
        assert_eq!(read_min_weight(&c).unwrap(), 0.01);
        assert_eq!(
            read_malformed_line_policy(&c).unwrap(),
            MalformedLinePolicy::Skip
        );
    }

    #[test]
    fn defaults_when_absent() {
        let c = FileConfigAdapter::empty();
        assert_eq!(read_thresholds(&c).unwrap(), Thresholds::default());
        assert_eq!(read_min_weight(&c).unwrap(), DEFAULT_MIN_WEIGHT);
        assert_eq!(
            read_malformed_line_policy(&c).unwrap(),
            MalformedLinePolicy::Abort
        );
    }

    #[test]
    fn non_numeric_threshold_is_invalid() {
        let err = validate_config(&config("[thresholds]\ncall_soft = lots\n")).unwrap_err();
        assert_eq!(invalid_key(err), "call_soft");
    }

    #[test]
    fn non_finite_threshold_is_invalid() {
        let err = validate_config(&config("[thresholds]\ncall_hard = inf\n")).unwrap_err();
        assert_eq!(invalid_key(err), "call_hard");
    }

    #[test]
    fn unordered_thresholds_are_invalid() {
        let err = validate_config(&config("[thresholds]\nput_hard = -0.1\n")).unwrap_err();
        assert_eq!(invalid_key(err), "put_hard");

        let err = validate_config(&config("[thresholds]\nput_soft = 0.3\n")).unwrap_err();
        assert_eq!(invalid_key(err), "put_soft");

        let err = validate_config(&config("[thresholds]\ncall_hard = 0.1\n")).unwrap_err();
        assert_eq!(invalid_key(err), "call_hard");
    }

    #[test]
    fn collapsed_soft_bands_are_allowed() {
        let t = Thresholds {
            put_hard: -0.5,
            put_soft: -0.5,
            call_soft: 0.5,
            call_hard: 0.5,
        };
        assert!(validate_thresholds(&t).is_ok());
    }

    #[test]
    fn min_weight_must_be_positive() {
        let err = validate_config(&config("[scoring]\nmin_weight = 0\n")).unwrap_err();
        assert_eq!(invalid_key(err), "min_weight");
    }

    #[test]
    fn unknown_policy_is_invalid() {
        let err = validate_config(&config("[batch]\nmalformed_lines = ignore\n")).unwrap_err();
        assert_eq!(invalid_key(err), "malformed_lines");
    }
}
