use followgraph_core::PersonaRecord;

/// Same-faction roster with handles `p0`, `p1`, ... and uniform targets.
#[must_use]
pub fn uniform_roster(size: usize, desired_in: u64, desired_out: u64) -> Vec<PersonaRecord> {
    (0..size)
        .map(|i| {
            PersonaRecord::new(format!("Persona {i}"), format!("p{i}"), "crew")
                .with_desired(desired_in, desired_out)
        })
        .collect()
}

/// A small mixed roster with hubs, two factions and skewed popularity.
#[must_use]
pub fn mixed_roster() -> Vec<PersonaRecord> {
    vec![
        PersonaRecord::new("Ada", "ada", "blue")
            .with_tags("#uk #hub_uk")
            .with_desired(400, 20),
        PersonaRecord::new("Bo", "bo", "blue")
            .with_tags("#uk")
            .with_desired(30, 10),
        PersonaRecord::new("Cy", "cy", "red")
            .with_tags("#fr #hub")
            .with_desired(900, 15),
        PersonaRecord::new("Di", "di", "red")
            .with_tags("#fr")
            .with_desired(12, 8),
        PersonaRecord::new("Ed", "ed", "green").with_desired(3, 5),
        PersonaRecord::new("Fy", "fy", "green")
            .with_tags("#uk #fr")
            .with_desired(50, 6),
    ]
}
