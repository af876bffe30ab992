//! People and classes: create, edit and class lifecycle.

use tracing::{info, warn};

use super::collection::generate_id;
use super::drafts::{AssistantDraft, ClassDraft, StudentDraft, TeacherDraft};
use super::CenterStore;
use crate::error::CenterResult;
use crate::models::{Assistant, Class, ClassStatus, Student, Teacher, WeeklySchedule};

impl CenterStore {
    /// Adds a student.
    pub fn create_student(&mut self, draft: StudentDraft) -> CenterResult<Student> {
        draft.validate(self)?;
        let student = Student {
            id: generate_id("S"),
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            status: draft.status,
        };
        info!(student_id = %student.id, "Created student");
        self.students.push(student.clone());
        Ok(student)
    }

    /// Replaces a student's details.
    pub fn update_student(&mut self, student_id: &str, draft: StudentDraft) -> CenterResult<Student> {
        self.students.require(student_id)?;
        draft.validate(self)?;
        let student = Student {
            id: student_id.to_string(),
            name: draft.name,
            phone: draft.phone,
            email: draft.email,
            status: draft.status,
        };
        self.students.replace(student.clone())?;
        info!(student_id = %student_id, "Updated student");
        Ok(student)
    }

    /// Adds a teacher, storing the salary tiers sorted by `min_students`.
    pub fn create_teacher(&mut self, draft: TeacherDraft) -> CenterResult<Teacher> {
        draft.validate(self)?;
        let teacher = build_teacher(generate_id("T"), draft);
        info!(teacher_id = %teacher.id, tiers = teacher.salary_tiers.len(), "Created teacher");
        self.teachers.push(teacher.clone());
        Ok(teacher)
    }

    /// Replaces a teacher's details.
    pub fn update_teacher(&mut self, teacher_id: &str, draft: TeacherDraft) -> CenterResult<Teacher> {
        self.teachers.require(teacher_id)?;
        draft.validate(self)?;
        let teacher = build_teacher(teacher_id.to_string(), draft);
        self.teachers.replace(teacher.clone())?;
        info!(teacher_id = %teacher_id, "Updated teacher");
        Ok(teacher)
    }

    /// Adds an assistant.
    pub fn create_assistant(&mut self, draft: AssistantDraft) -> CenterResult<Assistant> {
        draft.validate(self)?;
        let assistant = Assistant {
            id: generate_id("TA"),
            name: draft.name,
            phone: draft.phone,
            hourly_rate: draft.hourly_rate,
            status: draft.status,
        };
        info!(assistant_id = %assistant.id, "Created assistant");
        self.assistants.push(assistant.clone());
        Ok(assistant)
    }

    /// Replaces an assistant's details. Existing work logs keep their pay.
    pub fn update_assistant(
        &mut self,
        assistant_id: &str,
        draft: AssistantDraft,
    ) -> CenterResult<Assistant> {
        self.assistants.require(assistant_id)?;
        draft.validate(self)?;
        let assistant = Assistant {
            id: assistant_id.to_string(),
            name: draft.name,
            phone: draft.phone,
            hourly_rate: draft.hourly_rate,
            status: draft.status,
        };
        self.assistants.replace(assistant.clone())?;
        info!(assistant_id = %assistant_id, "Updated assistant");
        Ok(assistant)
    }

    /// Adds an active class.
    pub fn create_class(&mut self, draft: ClassDraft) -> CenterResult<Class> {
        draft.validate(self, None)?;
        let id = draft.id.clone().unwrap_or_else(|| generate_id("C"));
        let class = build_class(id, draft, ClassStatus::Active);
        warn_on_overlaps(&class.id, &class.schedule);
        info!(class_id = %class.id, "Created class");
        self.classes.push(class.clone());
        Ok(class)
    }

    /// Replaces a class's details, keeping its id and status.
    ///
    /// Existing enrollments keep the session counts they were created with.
    pub fn update_class(&mut self, class_id: &str, draft: ClassDraft) -> CenterResult<Class> {
        let status = self.classes.require(class_id)?.status;
        draft.validate(self, Some(class_id))?;
        let class = build_class(class_id.to_string(), draft, status);
        warn_on_overlaps(class_id, &class.schedule);
        self.classes.replace(class.clone())?;
        info!(class_id = %class_id, "Updated class");
        Ok(class)
    }

    /// Sets a class's lifecycle status.
    pub fn set_class_status(&mut self, class_id: &str, status: ClassStatus) -> CenterResult<Class> {
        let class = self.classes.require_mut(class_id)?;
        class.status = status;
        info!(class_id = %class_id, status = ?status, "Changed class status");
        Ok(class.clone())
    }
}

fn build_teacher(id: String, draft: TeacherDraft) -> Teacher {
    let salary_tiers = draft.sorted_tiers();
    Teacher {
        id,
        name: draft.name,
        phone: draft.phone,
        hourly_rate: draft.hourly_rate,
        salary_tiers,
        expertise: draft.expertise,
    }
}

fn build_class(id: String, draft: ClassDraft, status: ClassStatus) -> Class {
    Class {
        id,
        name: draft.name,
        teacher_id: draft.teacher_id,
        assistant_id: draft.assistant_id,
        schedule: draft.schedule,
        tuition_per_session: draft.tuition_per_session,
        start_date: draft.start_date,
        end_date: draft.end_date,
        max_students: draft.max_students,
        status,
    }
}

fn warn_on_overlaps(class_id: &str, schedule: &WeeklySchedule) {
    for (a, b) in schedule.overlapping_slots() {
        warn!(class_id = %class_id, slot_a = a, slot_b = b, "Schedule slots overlap on the same day");
    }
}
