//! Standard module snapping.
//!
//! Moves a draft onto the preferred module series and re-derives the worm
//! pitch diameter the way the active mode would have:
//!
//! - `Envelope`: keep the worm OD, so `d1` shifts by twice the addendum change.
//!   With `od_as_maximum` only modules not above the derived one are eligible.
//! - `FromWheel`: re-run the lead angle scan at the new module.
//! - `FromModule`: keep an explicit `d1`, otherwise re-derive it from the
//!   default lead angle.
//! - `FromCentreDistance`: keep the centre distance, `d1 = 2a - m z2`.

use tracing::debug;

use super::modes::{scan_worm_pitch_diameter, target_lead_angle, Draft};
use super::{DesignInput, DesignMode};
use crate::config::DesignPolicy;
use crate::equations;
use crate::errors::InfeasibleDesign;
use crate::standards::{StandardsTable, MODULE_SNAP_TOLERANCE_MM};

pub(crate) fn snap_to_standard(
    draft: Draft,
    input: &DesignInput,
    num_teeth: u32,
    standards: &StandardsTable,
    policy: &DesignPolicy,
) -> Result<Draft, InfeasibleDesign> {
    let target = match &input.mode {
        DesignMode::Envelope {
            od_as_maximum: true,
            ..
        } => match standards.nearest_module_not_above(draft.module_mm) {
            Some(module_mm) => module_mm,
            None => {
                debug!(module_mm = draft.module_mm, "no standard module below the envelope");
                return Ok(draft);
            }
        },
        _ => standards.nearest_module(draft.module_mm),
    };

    if (target - draft.module_mm).abs() <= MODULE_SNAP_TOLERANCE_MM {
        return Ok(draft);
    }

    let worm_pitch_diameter_mm = match &input.mode {
        DesignMode::Envelope { .. } => {
            draft.worm_pitch_diameter_mm - 2.0 * (target - draft.module_mm)
        }
        DesignMode::FromWheel {
            target_lead_angle_deg,
            ..
        } => {
            let gamma = target_lead_angle(*target_lead_angle_deg, standards, policy)?;
            scan_worm_pitch_diameter(target, input.num_starts, gamma, policy)
        }
        DesignMode::FromModule {
            worm_pitch_diameter_mm: Some(d1),
            ..
        } => *d1,
        DesignMode::FromModule { .. } => equations::pitch_diameter_for_lead_angle(
            target,
            input.num_starts,
            policy.default_lead_angle_deg,
        ),
        DesignMode::FromCentreDistance { centre_distance_mm } => {
            2.0 * centre_distance_mm - equations::wheel_pitch_diameter(target, num_teeth)
        }
    };

    if !(worm_pitch_diameter_mm > 0.0) {
        return Err(InfeasibleDesign::new(
            "module_mm",
            format!("{:.3}", target),
            format!(
                "Standard module {} mm leaves no room for the worm (pitch diameter {:.3} mm)",
                target, worm_pitch_diameter_mm
            ),
        ));
    }

    debug!(
        from_mm = draft.module_mm,
        to_mm = target,
        worm_pitch_diameter_mm,
        "module snapped to standard"
    );
    Ok(Draft {
        module_mm: target,
        worm_pitch_diameter_mm,
    })
}
