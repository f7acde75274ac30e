use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(LessonId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lesson {
    pub id: LessonId,
    pub slug: &'static str,
    pub title: &'static str,
}

/// Lessons in teaching order. Ids are the 1-based position in this table.
pub const LESSONS: &[Lesson] = &[
    Lesson {
        id: LessonId(1),
        slug: "assign",
        title: "Assign",
    },
    Lesson {
        id: LessonId(2),
        slug: "add",
        title: "Add",
    },
    Lesson {
        id: LessonId(3),
        slug: "minus",
        title: "Minus",
    },
    Lesson {
        id: LessonId(4),
        slug: "multiply",
        title: "Multiply",
    },
    Lesson {
        id: LessonId(5),
        slug: "divide",
        title: "Divide",
    },
    Lesson {
        id: LessonId(6),
        slug: "if",
        title: "If",
    },
    Lesson {
        id: LessonId(7),
        slug: "if-else",
        title: "If-Else",
    },
    Lesson {
        id: LessonId(8),
        slug: "for",
        title: "For Loop",
    },
];

impl Lesson {
    pub fn by_slug(slug: &str) -> Option<&'static Lesson> {
        LESSONS.iter().find(|lesson| lesson.slug == slug)
    }

    pub fn by_id(id: LessonId) -> Option<&'static Lesson> {
        LESSONS.iter().find(|lesson| lesson.id == id)
    }
}
