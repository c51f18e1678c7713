//! Normalized catalog entities.

use std::fmt;

/// Defines a typed index into one of the catalog tables.
macro_rules! index_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub usize);

        impl $name {
            /// Position in the owning catalog table.
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

index_type!(
    /// Index of a [`StudentGroup`] in the catalog.
    GroupIx
);
index_type!(
    /// Index of a [`Course`] in the catalog.
    CourseIx
);
index_type!(
    /// Index of a [`Teacher`] in the catalog.
    TeacherIx
);
index_type!(
    /// Index of a [`Room`] in the catalog.
    RoomIx
);

/// Course/room type. A room hosts a course only when their kinds are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CourseKind {
    Lecture,
    Laboratory,
    /// Any other type, stored lower-cased.
    Other(String),
}

impl CourseKind {
    /// Parses the provider's type label (`lec`, `lab`, ...), case-insensitively.
    pub fn parse(label: &str) -> Self {
        let label = label.trim().to_ascii_lowercase();
        match label.as_str() {
            "lec" | "lecture" => CourseKind::Lecture,
            "lab" | "laboratory" => CourseKind::Laboratory,
            _ => CourseKind::Other(label),
        }
    }

    /// Short label used in diagnostics.
    pub fn label(&self) -> &str {
        match self {
            CourseKind::Lecture => "lec",
            CourseKind::Laboratory => "lab",
            CourseKind::Other(label) => label,
        }
    }
}

impl fmt::Display for CourseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A course, keyed by its unique code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Course {
    pub code: String,
    pub description: String,
    /// Weekly scheduled hours, always at least 1.
    pub units: u32,
    pub kind: CourseKind,
}

/// A cohort scheduled as a unit: program, year, semester and block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StudentGroup {
    pub id: String,
    pub program: String,
    pub year: String,
    pub semester: String,
    pub block: String,
    /// Enrolled courses in enrollment order.
    pub courses: Vec<CourseIx>,
}

impl StudentGroup {
    /// Human-readable label, e.g. `BSCS-2-1-D`.
    pub fn label(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.program, self.year, self.semester, self.block
        )
    }
}

/// A teacher's qualification to teach one course.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Specialization {
    pub course: CourseIx,
    /// Weekly hours this teacher delivers for the course, across all groups.
    pub units: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub specializations: Vec<Specialization>,
}

impl Teacher {
    /// The specialization for `course`, if the teacher is qualified.
    pub fn specialization(&self, course: CourseIx) -> Option<&Specialization> {
        self.specializations.iter().find(|s| s.course == course)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub id: String,
    pub name: String,
    pub kind: CourseKind,
}
