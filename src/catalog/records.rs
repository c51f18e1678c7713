//! Raw records as delivered by data providers.
//!
//! Fields are kept as text (units included) so parsing failures surface as
//! [`CatalogError`](crate::error::CatalogError)s naming the record.

/// A course as it appears in enrollments, specializations or the course table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CourseRecord {
    pub code: String,
    pub description: String,
    pub units: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
}

impl CourseRecord {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        units: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            units: units.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupRecord {
    pub id: String,
    pub program: String,
    pub year: String,
    pub semester: String,
    pub block: String,
    pub courses: Vec<CourseRecord>,
}

impl GroupRecord {
    pub fn new(
        id: impl Into<String>,
        program: impl Into<String>,
        year: impl Into<String>,
        semester: impl Into<String>,
        block: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            program: program.into(),
            year: year.into(),
            semester: semester.into(),
            block: block.into(),
            courses: Vec::new(),
        }
    }

    pub fn with_course(mut self, course: CourseRecord) -> Self {
        self.courses.push(course);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeacherRecord {
    pub id: String,
    pub name: String,
    pub specialized: Vec<CourseRecord>,
}

impl TeacherRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            specialized: Vec::new(),
        }
    }

    pub fn with_specialization(mut self, course: CourseRecord) -> Self {
        self.specialized.push(course);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomRecord {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
}

impl RoomRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }
}
