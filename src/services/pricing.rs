//! Cálculo de tarifas de alquiler
//!
//! El costo total de una reserva es `días * tarifa_diaria`, donde los días
//! se cuentan sobre el rango semiabierto [start_date, end_date). Las
//! comparaciones monetarias usan una tolerancia fija de 0.01.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Días de alquiler del rango [start, end).
/// El llamador es responsable de garantizar end > start.
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Costo total esperado para `days` días a la tarifa indicada
pub fn expected_total(daily_rate: Decimal, days: i64) -> Decimal {
    daily_rate * Decimal::from(days)
}

/// Tolerancia para comparaciones monetarias (0.01)
pub fn cost_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Compara dos montos dentro de la tolerancia fija
pub fn amounts_match(claimed: Decimal, expected: Decimal) -> bool {
    (claimed - expected).abs() <= cost_tolerance()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_five_day_rental_at_45() {
        let days = rental_days(date(2024, 6, 1), date(2024, 6, 6));
        assert_eq!(days, 5);

        let total = expected_total(Decimal::new(4500, 2), days);
        assert_eq!(total, Decimal::new(22500, 2));
    }

    #[test]
    fn test_single_day_rental() {
        let days = rental_days(date(2024, 3, 10), date(2024, 3, 11));
        assert_eq!(days, 1);
        assert_eq!(
            expected_total(Decimal::new(9999, 2), days),
            Decimal::new(9999, 2)
        );
    }

    #[test]
    fn test_rental_spanning_month_boundary() {
        let days = rental_days(date(2024, 1, 30), date(2024, 2, 2));
        assert_eq!(days, 3);
    }

    #[test]
    fn test_amounts_match_within_tolerance() {
        let expected = Decimal::new(22500, 2);
        assert!(amounts_match(Decimal::new(22500, 2), expected));
        assert!(amounts_match(Decimal::new(22501, 2), expected));
        assert!(amounts_match(Decimal::new(22499, 2), expected));
    }

    #[test]
    fn test_amounts_differ_beyond_tolerance() {
        let expected = Decimal::new(22500, 2);
        assert!(!amounts_match(Decimal::new(22502, 2), expected));
        assert!(!amounts_match(Decimal::new(20000, 2), expected));
    }
}
