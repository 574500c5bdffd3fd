use crate::error::ProjectSheetError;
use glob::Pattern;

/// Which worksheet to load from a workbook.
#[derive(Clone, Debug, Default)]
pub struct Criteria {
    /// Sheet name patterns; `None` selects the active sheet.
    pub sheet_name_patterns: Option<Vec<Pattern>>,
}

impl Criteria {
    /// Builds criteria from glob patterns such as `"Storage*"`.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ProjectSheetError> {
        if patterns.is_empty() {
            return Ok(Self::default());
        }
        let patterns = patterns
            .iter()
            .map(|pattern| Pattern::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            sheet_name_patterns: Some(patterns),
        })
    }

    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub fn accept(&self, sheet_name: &str) -> bool {
        match &self.sheet_name_patterns {
            Some(patterns) => patterns.iter().any(|pattern| pattern.matches(sheet_name)),
            None => true,
        }
    }

    pub fn selects_active(&self) -> bool {
        self.sheet_name_patterns.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_patterns() -> Result<(), ProjectSheetError> {
        let criteria = Criteria::from_patterns(&["Storage*", "Leads"])?;
        assert!(criteria.accept("Storage Materials"));
        assert!(criteria.accept("Leads"));
        assert!(!criteria.accept("Suppliers"));
        assert!(!criteria.selects_active());
        Ok(())
    }

    #[test]
    fn empty_patterns_select_active() -> Result<(), ProjectSheetError> {
        let criteria = Criteria::from_patterns::<&str>(&[])?;
        assert!(criteria.selects_active());
        assert!(criteria.accept("anything"));
        Ok(())
    }

    #[test]
    fn invalid_pattern() {
        assert!(matches!(Criteria::from_patterns(&["[a"]), Err(ProjectSheetError::PatternError(_))));
    }
}
