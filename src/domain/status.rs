//! Load status lifecycle: the known status codes, their labels and colors, and
//! the advisory "what usually comes next" table.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadStatus {
    LoadCheckIn,
    ArrivedAtPickup,
    PickupCompete,
    EnRoute,
    ArrivedAtDelivery,
    Delivered,
    Archived,
}

/// Palette slot a status badge is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusColor {
    Primary,
    Success,
    Warning,
    Secondary,
}

impl LoadStatus {
    /// Lifecycle order.
    pub const ALL: [LoadStatus; 7] = [
        LoadStatus::LoadCheckIn,
        LoadStatus::ArrivedAtPickup,
        LoadStatus::PickupCompete,
        LoadStatus::EnRoute,
        LoadStatus::ArrivedAtDelivery,
        LoadStatus::Delivered,
        LoadStatus::Archived,
    ];

    /// Order of the status selection menu (matches the dispatcher web app).
    pub const MENU_ORDER: [LoadStatus; 7] = [
        LoadStatus::LoadCheckIn,
        LoadStatus::PickupCompete,
        LoadStatus::ArrivedAtDelivery,
        LoadStatus::ArrivedAtPickup,
        LoadStatus::EnRoute,
        LoadStatus::Archived,
        LoadStatus::Delivered,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            LoadStatus::LoadCheckIn => "loadCheckIn",
            LoadStatus::ArrivedAtPickup => "arrivedAtPickup",
            // Misspelled on the backend; the code must match it exactly.
            LoadStatus::PickupCompete => "pickupCompete",
            LoadStatus::EnRoute => "enRoute",
            LoadStatus::ArrivedAtDelivery => "arrivedAtDelivery",
            LoadStatus::Delivered => "delivered",
            LoadStatus::Archived => "archived",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadStatus::LoadCheckIn => "Load Check-In",
            LoadStatus::ArrivedAtPickup => "Arrived at Pickup",
            LoadStatus::PickupCompete => "Pickup Complete",
            LoadStatus::EnRoute => "En Route to Delivery",
            LoadStatus::ArrivedAtDelivery => "Arrived at Delivery",
            LoadStatus::Delivered => "Delivered",
            LoadStatus::Archived => "Archived",
        }
    }

    pub fn color(&self) -> StatusColor {
        match self {
            LoadStatus::Delivered => StatusColor::Success,
            LoadStatus::Archived => StatusColor::Secondary,
            _ => StatusColor::Primary,
        }
    }

    pub fn suggested_next(&self) -> &'static [LoadStatus] {
        match self {
            LoadStatus::LoadCheckIn => &[LoadStatus::ArrivedAtPickup, LoadStatus::PickupCompete],
            LoadStatus::ArrivedAtPickup => &[LoadStatus::PickupCompete],
            LoadStatus::PickupCompete => &[LoadStatus::EnRoute],
            LoadStatus::EnRoute => &[LoadStatus::ArrivedAtDelivery],
            LoadStatus::ArrivedAtDelivery => &[LoadStatus::Delivered],
            LoadStatus::Delivered | LoadStatus::Archived => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.suggested_next().is_empty()
    }
}

/// Suggestions for an arbitrary status string. Unknown statuses are terminal.
pub fn suggested_next(code: &str) -> &'static [LoadStatus] {
    LoadStatus::from_code(code)
        .map(|status| status.suggested_next())
        .unwrap_or(&[])
}

/// Human label; unknown and legacy statuses are shown capitalized as-is.
pub fn status_label(code: &str) -> String {
    match LoadStatus::from_code(code) {
        Some(status) => status.label().to_string(),
        None => capitalize_words(code),
    }
}

pub fn status_color(code: &str) -> StatusColor {
    if let Some(status) = LoadStatus::from_code(code) {
        return status.color();
    }
    // Legacy statuses from before the lifecycle codes existed.
    match code {
        "Delivered" => StatusColor::Success,
        "Processing" => StatusColor::Warning,
        "Scheduled" => StatusColor::Secondary,
        _ => StatusColor::Primary,
    }
}

pub fn is_delivered(code: &str) -> bool {
    code.eq_ignore_ascii_case(LoadStatus::Delivered.code())
}

fn capitalize_words(raw: &str) -> String {
    raw.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progression_follows_lifecycle() {
        let codes = |code: &str| {
            suggested_next(code)
                .iter()
                .map(LoadStatus::code)
                .collect::<Vec<_>>()
        };
        assert_eq!(codes("loadCheckIn"), vec!["arrivedAtPickup", "pickupCompete"]);
        assert_eq!(codes("arrivedAtPickup"), vec!["pickupCompete"]);
        assert_eq!(codes("pickupCompete"), vec!["enRoute"]);
        assert_eq!(codes("enRoute"), vec!["arrivedAtDelivery"]);
        assert_eq!(codes("arrivedAtDelivery"), vec!["delivered"]);
        assert!(codes("delivered").is_empty());
        assert!(codes("archived").is_empty());
    }

    #[test]
    fn codes_round_trip() {
        for status in LoadStatus::ALL {
            assert_eq!(LoadStatus::from_code(status.code()), Some(status));
        }
        assert_eq!(LoadStatus::from_code("Delivered"), None);
    }

    #[test]
    fn unknown_statuses_are_terminal_and_capitalized() {
        assert!(suggested_next("Active").is_empty());
        assert!(suggested_next("").is_empty());
        assert_eq!(status_label("processing"), "Processing");
        assert_eq!(status_label("on hold"), "On Hold");
        assert_eq!(status_label("pickupCompete"), "Pickup Complete");
    }

    #[test]
    fn colors_follow_status_kind() {
        assert_eq!(status_color("delivered"), StatusColor::Success);
        assert_eq!(status_color("archived"), StatusColor::Secondary);
        assert_eq!(status_color("enRoute"), StatusColor::Primary);
        assert_eq!(status_color("Processing"), StatusColor::Warning);
        assert_eq!(status_color("Scheduled"), StatusColor::Secondary);
        assert_eq!(status_color("Delivered"), StatusColor::Success);
        assert_eq!(status_color("whatever"), StatusColor::Primary);
    }

    #[test]
    fn only_terminal_states_have_no_suggestions() {
        let terminal: Vec<_> = LoadStatus::ALL
            .into_iter()
            .filter(LoadStatus::is_terminal)
            .collect();
        assert_eq!(terminal, vec![LoadStatus::Delivered, LoadStatus::Archived]);
    }
}
