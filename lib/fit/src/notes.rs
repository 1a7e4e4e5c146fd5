//! Human-readable fit notes

use crate::optimizer::{round_tenths, Deviation, DeviationReport, Dimension};

/// One note per reported dimension, in report order
pub fn fit_notes(report: &DeviationReport) -> Vec<String> {
    report
        .iter()
        .filter_map(|(dimension, deviation)| note(*dimension, deviation))
        .collect()
}

fn note(dimension: Dimension, deviation: &Deviation) -> Option<String> {
    // thresholds apply to the diff as reported
    let text = match (dimension, deviation.diff.map(round_tenths)) {
        (Dimension::Length, _) => format!("Body length: {} inches", deviation.garment),
        (_, None) => return None,
        (Dimension::Waist, Some(diff)) if diff > 2.0 => {
            format!("Waist will be loose by {:.0} inches - consider sizing down", diff)
        }
        (Dimension::Waist, Some(diff)) if diff < 0.0 => {
            format!("Waist may be snug by {:.0} inch(es)", diff.abs())
        }
        (Dimension::Waist, Some(diff)) => format!("Waist fits well with {:.0}\" ease", diff),
        (Dimension::Hip, Some(diff)) if diff > 4.0 => "Hip area will be very loose".to_string(),
        (Dimension::Hip, Some(diff)) if diff < 0.0 => "Hip area may be tight - consider sizing up".to_string(),
        (Dimension::Hip, Some(_)) => "Hip fit looks good".to_string(),
        (Dimension::Chest, Some(diff)) if diff > 5.0 => format!("Chest will be oversized by {:.0} inches", diff),
        (Dimension::Chest, Some(diff)) if diff < 2.0 => "Chest may be fitted/snug".to_string(),
        (Dimension::Chest, Some(diff)) => format!("Chest has comfortable {:.0}\" ease", diff),
    };

    Some(text)
}
