//! Profile fabrication — random customer identities from curated lists.
//!
//! Names and countries are deterministic given the customer's RNG
//! stream; only the uuid identifier comes from outside the stream.

use crate::clock::SimClock;
use crate::domain::{BusinessLine, Customer};
use crate::rng::CustomerRng;
use chrono::{Duration, Utc};
use uuid::Uuid;

const AGE_MIN_DAYS: u64 = 18 * 365;
const AGE_MAX_DAYS: u64 = 90 * 365;

pub struct ProfileFabricator;

impl ProfileFabricator {
    /// Fabricate a full customer identity for a business line.
    ///
    /// FRB is the domestic division, so its customers always reside in
    /// France; the other lines draw a random country of residence.
    pub fn fabricate(line: BusinessLine, rng: &mut CustomerRng) -> Customer {
        let first_name = (*rng.pick(Self::first_names())).to_string();
        let last_name = (*rng.pick(Self::last_names())).to_string();
        let age_days = rng.next_u64_in(AGE_MIN_DAYS, AGE_MAX_DAYS);
        let date_of_birth = Utc::now().date_naive() - Duration::days(age_days as i64);
        let nationality = (*rng.pick(Self::countries())).to_string();
        let country_of_residence = match line {
            BusinessLine::Frb => "France".to_string(),
            _ => (*rng.pick(Self::countries())).to_string(),
        };

        Customer {
            customer_id: Uuid::new_v4().to_string(),
            first_name,
            last_name,
            date_of_birth,
            nationality,
            country_of_residence,
            business_line: line,
            created_at: Utc::now(),
        }
    }

    /// Seed the customer's simulated timeline; onboarding happened
    /// somewhere 1–5 years in the past.
    pub fn backdated_clock(rng: &mut CustomerRng) -> SimClock {
        SimClock::backdated(rng)
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Claire", "Julien", "Margaux", "Antoine", "Camille", "Hugo", "Elodie",
            "Mathieu", "Sophie", "Nicolas", "Amelie", "Laurent", "Ines", "Olivier",
            "Manon", "Thibault", "Lucie", "Romain", "Chloe", "Sebastien", "Oliver",
            "Charlotte", "Harry", "Amelia", "George", "Isla", "Jack", "Emily",
            "Thomas", "Grace", "Stefan", "Greta", "Luca", "Chiara", "Mateo",
            "Lucia", "Jonas", "Freja", "Piotr", "Agnieszka", "Andrei", "Elena",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Martin", "Bernard", "Dubois", "Moreau", "Laurent", "Lefebvre",
            "Leroy", "Roux", "Fournier", "Girard", "Bonnet", "Dupont", "Lambert",
            "Rousseau", "Vincent", "Muller", "Faure", "Mercier", "Blanc",
            "Garnier", "Smith", "Jones", "Taylor", "Williams", "Brown", "Davies",
            "Evans", "Wilson", "Schmidt", "Fischer", "Weber", "Wagner", "Rossi",
            "Ferrari", "Esposito", "Garcia", "Fernandez", "Kowalski", "Novak",
            "Jansen", "Andersen", "Petrov",
        ]
    }

    fn countries() -> &'static [&'static str] {
        &[
            "France", "United Kingdom", "Germany", "Italy", "Spain", "Portugal",
            "Belgium", "Netherlands", "Luxembourg", "Switzerland", "Austria",
            "Ireland", "Denmark", "Sweden", "Norway", "Finland", "Poland",
            "Czech Republic", "Romania", "Greece", "Hungary", "Croatia",
            "Slovenia", "Slovakia", "Estonia", "Latvia", "Lithuania", "Malta",
            "Cyprus", "Bulgaria",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn fabrication_is_deterministic_apart_from_the_id() {
        let mut rng_a = CustomerRng::new(12345, 0);
        let mut rng_b = CustomerRng::new(12345, 0);

        let a = ProfileFabricator::fabricate(BusinessLine::Gbis, &mut rng_a);
        let b = ProfileFabricator::fabricate(BusinessLine::Gbis, &mut rng_b);

        assert_eq!(a.first_name, b.first_name);
        assert_eq!(a.last_name, b.last_name);
        assert_eq!(a.date_of_birth, b.date_of_birth);
        assert_eq!(a.nationality, b.nationality);
        assert_eq!(a.country_of_residence, b.country_of_residence);
        assert_ne!(a.customer_id, b.customer_id);
    }

    #[test]
    fn frb_customers_reside_in_france() {
        let mut rng = CustomerRng::new(5, 0);
        for _ in 0..50 {
            let c = ProfileFabricator::fabricate(BusinessLine::Frb, &mut rng);
            assert_eq!(c.country_of_residence, "France");
        }
    }

    #[test]
    fn dates_of_birth_span_adult_ages() {
        let mut rng = CustomerRng::new(6, 0);
        let this_year = Utc::now().date_naive().year();
        for _ in 0..100 {
            let c = ProfileFabricator::fabricate(BusinessLine::Irfs, &mut rng);
            let age_years = this_year - c.date_of_birth.year();
            assert!((17..=91).contains(&age_years), "age {age_years} out of range");
        }
    }
}
