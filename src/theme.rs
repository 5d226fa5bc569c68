#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerFlow {
    FromGrid,
    ToGrid,
    FromBattery,
    Powerloss,
}

// Grid exchange wins over battery: as long as the grid is up, the panel
// reports import or export, even while the battery is also active.
pub fn power_flow(
    grid_status: &str,
    battery_status: &str,
    power_usage: f64,
    solar_power: f64,
) -> PowerFlow {
    if grid_status == "Active" && power_usage >= solar_power {
        PowerFlow::FromGrid
    } else if grid_status == "Active" {
        PowerFlow::ToGrid
    } else if battery_status == "Active" {
        PowerFlow::FromBattery
    } else {
        PowerFlow::Powerloss
    }
}

pub fn solar_icon(status: &str) -> &'static str {
    if status == "Active" {
        "fas fa-solar-panel fa-7x w3-text-orange"
    } else {
        "fas fa-solar-panel fa-7x w3-text-blue"
    }
}

pub fn battery_icon(charge: f64, critical: bool) -> &'static str {
    if critical {
        "fas fa-battery-full fa-7x w3-text-red"
    } else if charge >= 95.0 {
        "fas fa-battery-full fa-7x w3-text-green"
    } else if charge >= 75.0 {
        "fas fa-battery-three-quarters fa-7x w3-text-yellow"
    } else if charge >= 50.0 {
        "fas fa-battery-half fa-7x w3-text-yellow"
    } else if charge >= 25.0 {
        "fas fa-battery-quarter fa-7x w3-text-red"
    } else {
        "fas fa-battery-empty fa-7x w3-text-red"
    }
}

pub fn temp_color(fahrenheit: f64) -> &'static str {
    if fahrenheit <= 50.0 {
        "w3-text-blue"
    } else if fahrenheit <= 70.0 {
        "w3-text-yellow"
    } else if fahrenheit <= 80.0 {
        "w3-text-green"
    } else if fahrenheit <= 90.0 {
        "w3-text-orange"
    } else {
        "w3-text-red"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battery_buckets_are_inclusive_at_the_bottom() {
        assert_eq!(battery_icon(100.0, false), "fas fa-battery-full fa-7x w3-text-green");
        assert_eq!(battery_icon(95.0, false), "fas fa-battery-full fa-7x w3-text-green");
        assert_eq!(
            battery_icon(94.9, false),
            "fas fa-battery-three-quarters fa-7x w3-text-yellow"
        );
        assert_eq!(
            battery_icon(75.0, false),
            "fas fa-battery-three-quarters fa-7x w3-text-yellow"
        );
        assert_eq!(battery_icon(74.9, false), "fas fa-battery-half fa-7x w3-text-yellow");
        assert_eq!(battery_icon(50.0, false), "fas fa-battery-half fa-7x w3-text-yellow");
        assert_eq!(battery_icon(25.0, false), "fas fa-battery-quarter fa-7x w3-text-red");
        assert_eq!(battery_icon(24.9, false), "fas fa-battery-empty fa-7x w3-text-red");
        assert_eq!(battery_icon(0.0, false), "fas fa-battery-empty fa-7x w3-text-red");
    }

    #[test]
    fn critical_battery_overrides_the_charge() {
        assert_eq!(battery_icon(100.0, true), "fas fa-battery-full fa-7x w3-text-red");
        assert_eq!(battery_icon(3.0, true), "fas fa-battery-full fa-7x w3-text-red");
    }

    #[test]
    fn temperature_buckets() {
        assert_eq!(temp_color(32.0), "w3-text-blue");
        assert_eq!(temp_color(50.0), "w3-text-blue");
        assert_eq!(temp_color(50.1), "w3-text-yellow");
        assert_eq!(temp_color(70.0), "w3-text-yellow");
        assert_eq!(temp_color(80.0), "w3-text-green");
        assert_eq!(temp_color(90.0), "w3-text-orange");
        assert_eq!(temp_color(90.1), "w3-text-red");
    }

    #[test]
    fn solar_icon_follows_the_inverter_status() {
        assert_eq!(solar_icon("Active"), "fas fa-solar-panel fa-7x w3-text-orange");
        assert_eq!(solar_icon("Inactive"), "fas fa-solar-panel fa-7x w3-text-blue");
    }

    #[test]
    fn grid_import_wins_on_equal_usage() {
        assert_eq!(power_flow("Active", "Active", 2.0, 2.0), PowerFlow::FromGrid);
        assert_eq!(power_flow("Active", "Inactive", 5.0, 1.0), PowerFlow::FromGrid);
        assert_eq!(power_flow("Active", "Inactive", 1.0, 5.0), PowerFlow::ToGrid);
        assert_eq!(power_flow("Inactive", "Active", 2.0, 0.0), PowerFlow::FromBattery);
        assert_eq!(power_flow("Inactive", "Inactive", 2.0, 0.0), PowerFlow::Powerloss);
    }
}
