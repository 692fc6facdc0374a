use chrono::NaiveDate;

pub const DEFAULT_FINE_PER_DAY: f64 = 1.0;

/// Overdue fine for a loan due on `due_date`, assessed on `as_of`.
///
/// Nothing is owed without a due date or on/before it. Afterwards each whole
/// day past the due date costs `per_day`.
pub fn calculate_fine(due_date: Option<NaiveDate>, as_of: NaiveDate, per_day: f64) -> f64 {
    let Some(due) = due_date else {
        return 0.0;
    };

    let days_overdue = as_of.signed_duration_since(due).num_days();
    if days_overdue <= 0 {
        return 0.0;
    }

    days_overdue as f64 * per_day
}
