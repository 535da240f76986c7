//! Admin roster view collaborator: section-grouped students, refreshed only
//! by re-fetching from the backend, never edited in place.

use std::sync::Arc;

use crate::backend::AttendanceBackend;
use crate::error::AttendanceError;
use crate::models::{Section, SectionGroup, Student};

pub struct RosterDirectory {
    backend: Arc<dyn AttendanceBackend>,
    groups: Vec<SectionGroup>,
}

impl RosterDirectory {
    pub fn new(backend: Arc<dyn AttendanceBackend>) -> Self {
        RosterDirectory {
            backend,
            groups: Vec::new(),
        }
    }

    /// Replace the grouping wholesale from `GET /sections`.
    pub async fn load(&mut self) -> Result<(), AttendanceError> {
        self.groups = self.backend.sections().await?;
        log::debug!(
            "[ROSTER] loaded {} sections ({} students)",
            self.groups.len(),
            self.total_students()
        );
        Ok(())
    }

    /// Move a student to another section, then re-fetch the grouping: local
    /// state is never patched from the submission alone.
    pub async fn assign(
        &mut self,
        student_id: &str,
        new_section: Section,
    ) -> Result<Student, AttendanceError> {
        if student_id.trim().is_empty() {
            return Err(AttendanceError::Validation(
                "No student selected.".to_string(),
            ));
        }
        let updated = self
            .backend
            .assign_section(student_id, &new_section.to_string())
            .await?;
        self.load().await?;
        Ok(updated)
    }

    pub fn groups(&self) -> &[SectionGroup] {
        &self.groups
    }

    pub fn total_students(&self) -> usize {
        self.groups.iter().map(|g| g.students.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::ScriptedBackend;

    fn student(id: &str, section: &str) -> Student {
        Student {
            id: id.to_string(),
            name: format!("Student {}", id),
            email: None,
            section: section.to_string(),
        }
    }

    fn group(section: &str, students: Vec<Student>) -> SectionGroup {
        SectionGroup {
            section: section.to_string(),
            students,
        }
    }

    #[tokio::test]
    async fn test_assign_refreshes_grouping_via_refetch() {
        let backend = Arc::new(ScriptedBackend::new());
        // Initial grouping: s1 in A.
        backend.push_sections(Ok(vec![
            group("A", vec![student("s1", "A")]),
            group("B", vec![]),
        ]));
        // Grouping after the move: s1 in B.
        backend.push_sections(Ok(vec![
            group("A", vec![]),
            group("B", vec![student("s1", "B")]),
        ]));
        backend.push_assignment(Ok(student("s1", "B")));

        let mut roster = RosterDirectory::new(backend.clone());
        roster.load().await.unwrap();
        assert_eq!(roster.groups()[0].students.len(), 1);

        let moved = roster.assign("s1", Section::B).await.unwrap();
        assert_eq!(moved.section, "B");

        // The grouping reflects the re-fetch, not a local patch.
        assert!(roster.groups()[0].students.is_empty());
        assert_eq!(roster.groups()[1].students[0].id, "s1");
        assert_eq!(
            backend
                .section_calls
                .load(std::sync::atomic::Ordering::SeqCst),
            2
        );
    }

    #[tokio::test]
    async fn test_assign_rejects_missing_student_locally() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut roster = RosterDirectory::new(backend.clone());

        let result = roster.assign("", Section::A).await;
        assert!(matches!(result, Err(AttendanceError::Validation(_))));
        assert_eq!(
            backend
                .assign_calls
                .load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }
}
