//! Detección de solapamientos de reservas
//!
//! Las reservas usan rangos de fechas semiabiertos [start, end): una reserva
//! que termina el día D no choca con otra que empieza el día D. Este módulo
//! implementa el predicado puro; el repositorio de reservas ejecuta la misma
//! condición en SQL dentro de la transacción de la reserva.

use chrono::NaiveDate;

/// Verifica si un rango existente [existing_start, existing_end) se solapa
/// con un rango propuesto [proposed_start, proposed_end).
pub fn periods_overlap(
    existing_start: NaiveDate,
    existing_end: NaiveDate,
    proposed_start: NaiveDate,
    proposed_end: NaiveDate,
) -> bool {
    // El inicio propuesto cae dentro del rango existente
    (existing_start <= proposed_start && existing_end > proposed_start)
        // El fin propuesto cae dentro del rango existente
        || (existing_start < proposed_end && existing_end >= proposed_end)
        // El rango propuesto contiene al existente
        || (existing_start >= proposed_start && existing_end <= proposed_end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_partial_overlap_conflicts() {
        // Reserva existente [07-03, 07-08) contra propuesta [07-01, 07-05)
        assert!(periods_overlap(
            date(2024, 7, 3),
            date(2024, 7, 8),
            date(2024, 7, 1),
            date(2024, 7, 5),
        ));
    }

    #[test]
    fn test_proposed_start_inside_existing() {
        assert!(periods_overlap(
            date(2024, 7, 1),
            date(2024, 7, 5),
            date(2024, 7, 3),
            date(2024, 7, 8),
        ));
    }

    #[test]
    fn test_containment_both_directions() {
        // La propuesta contiene a la existente
        assert!(periods_overlap(
            date(2024, 7, 3),
            date(2024, 7, 5),
            date(2024, 7, 1),
            date(2024, 7, 10),
        ));
        // La existente contiene a la propuesta
        assert!(periods_overlap(
            date(2024, 7, 1),
            date(2024, 7, 10),
            date(2024, 7, 3),
            date(2024, 7, 5),
        ));
    }

    #[test]
    fn test_identical_ranges_conflict() {
        assert!(periods_overlap(
            date(2024, 7, 1),
            date(2024, 7, 5),
            date(2024, 7, 1),
            date(2024, 7, 5),
        ));
    }

    #[test]
    fn test_back_to_back_ranges_do_not_conflict() {
        // Existente termina el mismo día que empieza la propuesta
        assert!(!periods_overlap(
            date(2024, 7, 1),
            date(2024, 7, 5),
            date(2024, 7, 5),
            date(2024, 7, 9),
        ));
        // Y en el orden inverso
        assert!(!periods_overlap(
            date(2024, 7, 5),
            date(2024, 7, 9),
            date(2024, 7, 1),
            date(2024, 7, 5),
        ));
    }

    #[test]
    fn test_disjoint_ranges_do_not_conflict() {
        assert!(!periods_overlap(
            date(2024, 7, 1),
            date(2024, 7, 3),
            date(2024, 7, 10),
            date(2024, 7, 12),
        ));
    }
}
