/// Stats from a tracker run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub countries_checked: u32,
    pub unchanged: u32,
    pub notified: u32,
    pub first_observations: u32,
    pub failed: u32,
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Tracker Run Complete ===")?;
        writeln!(f, "Countries checked:  {}", self.countries_checked)?;
        writeln!(f, "Unchanged:          {}", self.unchanged)?;
        writeln!(f, "Changes notified:   {}", self.notified)?;
        writeln!(f, "First observations: {}", self.first_observations)?;
        writeln!(f, "Failed:             {}", self.failed)?;
        Ok(())
    }
}
