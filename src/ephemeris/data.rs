//! Orbital elements and physical data for the built-in solar system (J2000 epoch).
//! Source: NASA JPL approximate elements, mean values.

use super::kepler::OrbitalElements;
use super::{BodyId, BodyTable, BodyTableError, CelestialBody};
use crate::types::UnitSystem;

/// Sun mass in kg.
const SUN_MASS: f64 = 1.98847e30;

/// Sun radius in km.
const SUN_RADIUS_KM: f64 = 695_700.0;

/// Heliocentric planet record: orbit in AU/days/degrees, mass in kg, radius in km.
struct PlanetRecord {
    name: &'static str,
    semi_major_axis_au: f64,
    eccentricity: f64,
    period_days: f64,
    inclination_deg: f64,
    ascending_node_deg: f64,
    periapsis_deg: f64,
    mean_anomaly_deg: f64,
    mass: f64,
    radius_km: f64,
}

const PLANETS: [PlanetRecord; 8] = [
    PlanetRecord {
        name: "Mercury",
        semi_major_axis_au: 0.387098,
        eccentricity: 0.205630,
        period_days: 87.969,
        inclination_deg: 7.005,
        ascending_node_deg: 48.331,
        periapsis_deg: 29.124,
        mean_anomaly_deg: 174.796,
        mass: 3.3011e23,
        radius_km: 2439.7,
    },
    PlanetRecord {
        name: "Venus",
        semi_major_axis_au: 0.723332,
        eccentricity: 0.006772,
        period_days: 224.701,
        inclination_deg: 3.39458,
        ascending_node_deg: 76.680,
        periapsis_deg: 54.884,
        mean_anomaly_deg: 50.115,
        mass: 4.8675e24,
        radius_km: 6051.8,
    },
    PlanetRecord {
        name: "Earth",
        semi_major_axis_au: 1.000001018,
        eccentricity: 0.0167086,
        period_days: 365.256,
        inclination_deg: 0.00005,
        ascending_node_deg: -11.26064,
        periapsis_deg: 114.20783,
        mean_anomaly_deg: 358.617,
        mass: 5.97237e24,
        radius_km: 6371.0,
    },
    PlanetRecord {
        name: "Mars",
        semi_major_axis_au: 1.523679,
        eccentricity: 0.0934,
        period_days: 686.980,
        inclination_deg: 1.850,
        ascending_node_deg: 49.558,
        periapsis_deg: 286.502,
        mean_anomaly_deg: 19.412,
        mass: 6.4171e23,
        radius_km: 3389.5,
    },
    PlanetRecord {
        name: "Jupiter",
        semi_major_axis_au: 5.2044,
        eccentricity: 0.0489,
        period_days: 4332.59,
        inclination_deg: 1.303,
        ascending_node_deg: 100.464,
        periapsis_deg: 273.867,
        mean_anomaly_deg: 20.020,
        mass: 1.8982e27,
        radius_km: 69_911.0,
    },
    PlanetRecord {
        name: "Saturn",
        semi_major_axis_au: 9.5826,
        eccentricity: 0.0565,
        period_days: 10_759.22,
        inclination_deg: 2.485,
        ascending_node_deg: 113.665,
        periapsis_deg: 339.392,
        mean_anomaly_deg: 317.020,
        mass: 5.6834e26,
        radius_km: 58_232.0,
    },
    PlanetRecord {
        name: "Uranus",
        semi_major_axis_au: 19.2184,
        eccentricity: 0.046381,
        period_days: 30_688.5,
        inclination_deg: 0.773,
        ascending_node_deg: 74.006,
        periapsis_deg: 96.998857,
        mean_anomaly_deg: 142.2386,
        mass: 8.6810e25,
        radius_km: 25_362.0,
    },
    PlanetRecord {
        name: "Neptune",
        semi_major_axis_au: 30.11,
        eccentricity: 0.009456,
        period_days: 60_195.0,
        inclination_deg: 1.767975,
        ascending_node_deg: 131.784,
        periapsis_deg: 276.336,
        mean_anomaly_deg: 256.228,
        mass: 1.02413e26,
        radius_km: 24_622.0,
    },
];

/// Build the Sun, the eight planets and the Moon, converted to working units.
pub fn solar_system(units: &UnitSystem) -> Result<BodyTable, BodyTableError> {
    let mut table = BodyTable::new();

    let sun = table.insert(CelestialBody::stationary(
        "Sun",
        SUN_MASS,
        units.km_to_units(SUN_RADIUS_KM),
    ))?;

    let mut earth = None;
    for record in &PLANETS {
        let id = table.insert(planet(record, units).orbiting(sun))?;
        if record.name == "Earth" {
            earth = Some(id);
        }
    }

    if let Some(earth) = earth {
        table.insert(moon(units, earth))?;
    }

    Ok(table)
}

fn planet(record: &PlanetRecord, units: &UnitSystem) -> CelestialBody {
    let elements = OrbitalElements::new(
        units.au_to_units(record.semi_major_axis_au),
        record.eccentricity,
        record.period_days,
    )
    .with_orientation_deg(
        record.inclination_deg,
        record.ascending_node_deg,
        record.periapsis_deg,
    )
    .with_mean_anomaly_deg(record.mean_anomaly_deg);

    CelestialBody::new(
        record.name,
        elements,
        record.mass,
        units.km_to_units(record.radius_km),
    )
}

fn moon(units: &UnitSystem, earth: BodyId) -> CelestialBody {
    let elements = OrbitalElements::new(units.km_to_units(384_399.0), 0.0549, 27.321661)
        .with_orientation_deg(5.145, 125.08, 318.15)
        .with_mean_anomaly_deg(135.27);

    CelestialBody::new("Moon", elements, 7.342e22, units.km_to_units(1737.4)).orbiting(earth)
}
