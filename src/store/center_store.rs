//! The center's whole data set and its cascade rules.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::collection::Collection;
use crate::error::{CenterError, CenterResult};
use crate::models::{
    Assistant, AttendanceRecord, Class, Enrollment, MakeupLesson, Student, TaWorkLog, Teacher,
    Transaction,
};

/// Every entity list of the center.
///
/// This is also the shape of the persisted blob: one JSON object with the
/// nine lists under camelCase keys. Lists missing from a blob load as empty.
///
/// Loading keeps each list in blob order. New transactions and assistant
/// timesheet entries are inserted at the front, so a list built here reads
/// newest first, while entries loaded from an older blob keep their stored
/// order behind the new ones. Readers that need chronology sort by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CenterStore {
    /// Students.
    pub students: Collection<Student>,
    /// Teachers.
    pub teachers: Collection<Teacher>,
    /// Teaching assistants.
    pub assistants: Collection<Assistant>,
    /// Assistant timesheet entries, newest first.
    pub ta_work_logs: Collection<TaWorkLog>,
    /// Classes.
    pub classes: Collection<Class>,
    /// Enrollments.
    pub enrollments: Collection<Enrollment>,
    /// Attendance records.
    pub attendance_records: Collection<AttendanceRecord>,
    /// Makeup lessons.
    pub makeup_lessons: Collection<MakeupLesson>,
    /// Financial transactions, newest first.
    pub transactions: Collection<Transaction>,
}

/// How many records still point at a deleted entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanReport {
    /// Attendance records referencing the entity.
    pub attendance_records: usize,
    /// Makeup lessons referencing the entity.
    pub makeup_lessons: usize,
    /// Work logs referencing the entity.
    pub work_logs: usize,
    /// Transactions referencing the entity.
    pub transactions: usize,
}

impl OrphanReport {
    /// Total number of orphaned records.
    pub fn total(&self) -> usize {
        self.attendance_records + self.makeup_lessons + self.work_logs + self.transactions
    }
}

/// Result of a cascading delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    /// Enrollments removed along with the entity.
    pub removed_enrollments: usize,
    /// Records left behind that still reference the entity.
    pub orphans: OrphanReport,
}

impl CenterStore {
    /// Parses a persisted blob.
    pub fn from_json(value: serde_json::Value) -> CenterResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serializes the store into a persisted blob.
    pub fn to_json(&self) -> CenterResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Returns true if every list is empty.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
            && self.teachers.is_empty()
            && self.assistants.is_empty()
            && self.ta_work_logs.is_empty()
            && self.classes.is_empty()
            && self.enrollments.is_empty()
            && self.attendance_records.is_empty()
            && self.makeup_lessons.is_empty()
            && self.transactions.is_empty()
    }

    /// Returns the display name of a student, if it still exists.
    pub fn student_name(&self, student_id: &str) -> Option<&str> {
        self.students.get(student_id).map(|s| s.name.as_str())
    }

    /// Returns the display name of a class, if it still exists.
    pub fn class_name(&self, class_id: &str) -> Option<&str> {
        self.classes.get(class_id).map(|c| c.name.as_str())
    }

    /// Deletes a student and their enrollments.
    ///
    /// Attendance, makeup and transaction history is kept and keeps pointing
    /// at the deleted id.
    pub fn delete_student(&mut self, student_id: &str) -> CenterResult<DeleteOutcome> {
        self.students
            .remove(student_id)
            .ok_or_else(|| CenterError::not_found("student", student_id))?;
        let removed_enrollments = self.enrollments.retain(|e| e.student_id != student_id);

        let orphans = OrphanReport {
            attendance_records: self
                .attendance_records
                .iter()
                .filter(|r| r.status_of(student_id).is_some())
                .count(),
            makeup_lessons: self
                .makeup_lessons
                .iter()
                .filter(|m| m.student_id == student_id)
                .count(),
            work_logs: 0,
            transactions: self
                .transactions
                .iter()
                .filter(|t| t.student_id.as_deref() == Some(student_id))
                .count(),
        };

        info!(student_id = %student_id, removed_enrollments, "Deleted student");
        if orphans.total() > 0 {
            warn!(
                student_id = %student_id,
                orphaned = orphans.total(),
                "Deleted student is still referenced by history"
            );
        }

        Ok(DeleteOutcome {
            removed_enrollments,
            orphans,
        })
    }

    /// Deletes a class and its enrollments.
    ///
    /// Attendance records, makeup lessons and work logs of the class are kept.
    pub fn delete_class(&mut self, class_id: &str) -> CenterResult<DeleteOutcome> {
        self.classes
            .remove(class_id)
            .ok_or_else(|| CenterError::not_found("class", class_id))?;
        let removed_enrollments = self.enrollments.retain(|e| e.class_id != class_id);

        let orphans = OrphanReport {
            attendance_records: self
                .attendance_records
                .iter()
                .filter(|r| r.class_id == class_id)
                .count(),
            makeup_lessons: self
                .makeup_lessons
                .iter()
                .filter(|m| m.original_class_id == class_id)
                .count(),
            work_logs: self
                .ta_work_logs
                .iter()
                .filter(|l| l.class_id.as_deref() == Some(class_id))
                .count(),
            transactions: 0,
        };

        info!(class_id = %class_id, removed_enrollments, "Deleted class");
        if orphans.total() > 0 {
            warn!(
                class_id = %class_id,
                orphaned = orphans.total(),
                "Deleted class is still referenced by history"
            );
        }

        Ok(DeleteOutcome {
            removed_enrollments,
            orphans,
        })
    }

    /// Deletes a teacher. Classes and history keep the teacher's id.
    pub fn delete_teacher(&mut self, teacher_id: &str) -> CenterResult<Teacher> {
        let teacher = self
            .teachers
            .remove(teacher_id)
            .ok_or_else(|| CenterError::not_found("teacher", teacher_id))?;
        let assigned = self
            .classes
            .iter()
            .filter(|c| c.teacher_id == teacher_id)
            .count();
        info!(teacher_id = %teacher_id, "Deleted teacher");
        if assigned > 0 {
            warn!(teacher_id = %teacher_id, classes = assigned, "Deleted teacher is still assigned to classes");
        }
        Ok(teacher)
    }

    /// Deletes an assistant. Work logs and classes keep the assistant's id.
    pub fn delete_assistant(&mut self, assistant_id: &str) -> CenterResult<Assistant> {
        let assistant = self
            .assistants
            .remove(assistant_id)
            .ok_or_else(|| CenterError::not_found("assistant", assistant_id))?;
        let logs = self
            .ta_work_logs
            .iter()
            .filter(|l| l.assistant_id == assistant_id)
            .count();
        info!(assistant_id = %assistant_id, "Deleted assistant");
        if logs > 0 {
            warn!(assistant_id = %assistant_id, work_logs = logs, "Deleted assistant still has work logs");
        }
        Ok(assistant)
    }

    /// Deletes a single work log.
    pub fn delete_work_log(&mut self, log_id: &str) -> CenterResult<TaWorkLog> {
        let log = self
            .ta_work_logs
            .remove(log_id)
            .ok_or_else(|| CenterError::not_found("work log", log_id))?;
        info!(log_id = %log_id, "Deleted work log");
        Ok(log)
    }
}
