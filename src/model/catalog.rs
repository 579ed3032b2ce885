//! Static content served to the frontend: the skill-development course
//! catalog, assessment descriptions and shared constants.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Course {
    pub title: &'static str,
    pub description: &'static str,
    pub link: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SkillCategory {
    pub category: &'static str,
    pub description: &'static str,
    pub courses: &'static [Course],
}

impl SkillCategory {
    /// Case-insensitive match against the category, its description, or any
    /// course title/description. An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let hit = |text: &str| text.to_lowercase().contains(&query);
        hit(self.category)
            || hit(self.description)
            || self.courses.iter().any(|c| hit(c.title) || hit(c.description))
    }
}

pub static SKILL_CATEGORIES: &[SkillCategory] = &[
    SkillCategory {
        category: "Adaptability and Flexibility",
        description: "Courses to enhance your ability to adapt to changing situations and environments",
        courses: &[
            Course {
                title: "Adaptive Leadership",
                description: "Learn how to lead through change and uncertainty",
                link: "https://acumenacademy.org/course/adaptive-leadership/",
            },
            Course {
                title: "Adaptability and Resiliency",
                description: "Develop skills for rapid problem-solving and decision-making",
                link: "https://www.coursera.org/learn/adaptability-and-resiliency",
            },
        ],
    },
    SkillCategory {
        category: "Communication",
        description: "Courses to improve your verbal and written communication skills",
        courses: &[
            Course {
                title: "Effective Communication",
                description: "Master the art of clear and impactful communication",
                link: "https://academy.rics.org/e-learning/business-and-management-skills/business-skills/effective-communication",
            },
            Course {
                title: "Business Writing",
                description: "Professional writing skills for the workplace",
                link: "https://www.coursera.org/learn/writing-for-business",
            },
        ],
    },
    SkillCategory {
        category: "Leadership",
        description: "Courses to develop your leadership capabilities",
        courses: &[
            Course {
                title: "Leadership Fundamentals",
                description: "Core concepts of effective leadership",
                link: "https://www.oxfordhomestudy.com/courses/leadership-courses-online/leadership-v-management-free",
            },
            Course {
                title: "Team Leadership",
                description: "Leading and managing teams effectively",
                link: "https://www.coursera.org/learn/leading-teams",
            },
        ],
    },
    SkillCategory {
        category: "Presentation",
        description: "Courses to enhance your presentation skills",
        courses: &[
            Course {
                title: "Presentation Skills",
                description: "Master the art of presenting effectively",
                link: "https://www.futurelearn.com/courses/become-a-better-presenter",
            },
            Course {
                title: "Visual Storytelling",
                description: "Create compelling visual presentations",
                link: "https://www.udemy.com/visual-storytelling",
            },
        ],
    },
    SkillCategory {
        category: "Problem Solving",
        description: "Courses to develop your analytical and problem-solving skills",
        courses: &[
            Course {
                title: "Critical Thinking",
                description: "Enhance your analytical reasoning skills",
                link: "https://www.coursera.org/specializations/logic-critical-thinking-duke",
            },
            Course {
                title: "Decision Making",
                description: "Effective decision-making strategies",
                link: "https://www.coursera.org/learn/problem-solving",
            },
        ],
    },
];

pub fn search_categories(query: &str) -> Vec<&'static SkillCategory> {
    SKILL_CATEGORIES.iter().filter(|c| c.matches(query)).collect()
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub slug: &'static str,
    pub title: &'static str,
    pub tagline: &'static str,
    pub category: &'static str,
    pub duration_minutes: u32,
    pub item_count: u32,
    pub about: &'static str,
    pub instructions: &'static [&'static str],
    pub start_path: &'static str,
}

pub static ASSESSMENTS: &[Assessment] = &[Assessment {
    slug: "puzzle-game",
    title: "Puzzle Game Assessment",
    tagline: "Test your logic and pattern recognition skills",
    category: "Puzzle Game",
    duration_minutes: 30,
    item_count: 20,
    about: "Challenge your logic, pattern recognition, and problem-solving skills with a series of \
            interactive puzzles. This assessment is designed to test your ability to think critically \
            and adapt to new challenges quickly.",
    instructions: &[
        "Read each puzzle carefully before solving",
        "You have 30 minutes to complete all puzzles",
        "You cannot pause the assessment once started",
        "Ensure you have a stable internet connection",
        "Try to solve as many puzzles as possible for a higher score",
    ],
    start_path: "/assessment/puzzle-game/start",
}];

pub fn find_assessment(slug: &str) -> Option<&'static Assessment> {
    ASSESSMENTS.iter().find(|a| a.slug.eq_ignore_ascii_case(slug))
}

pub static ASSESSMENT_TYPES: &[&str] = &["writing", "speaking", "reading", "listening"];
pub static CEFR_LEVELS: &[&str] = &["a1", "a2", "b1", "b2", "c1", "c2"];
pub static LANGUAGES: &[&str] = &["english", "french"];

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConstants {
    pub assessment_types: &'static [&'static str],
    pub cefr_levels: &'static [&'static str],
    pub languages: &'static [&'static str],
}

pub fn constants() -> CatalogConstants {
    CatalogConstants {
        assessment_types: ASSESSMENT_TYPES,
        cefr_levels: CEFR_LEVELS,
        languages: LANGUAGES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_returns_everything() {
        assert_eq!(search_categories("").len(), SKILL_CATEGORIES.len());
        assert_eq!(search_categories("   ").len(), SKILL_CATEGORIES.len());
    }

    #[test]
    fn test_query_matches_category_name() {
        let hits = search_categories("LEADER");
        let names: Vec<_> = hits.iter().map(|c| c.category).collect();
        assert!(names.contains(&"Leadership"));
        assert!(names.contains(&"Adaptability and Flexibility"));
    }

    #[test]
    fn test_query_matches_course_description() {
        let hits = search_categories("storytelling");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].category, "Presentation");
    }

    #[test]
    fn test_query_without_hits() {
        assert!(search_categories("quantum chromodynamics").is_empty());
    }

    #[test]
    fn test_find_assessment() {
        let puzzle = find_assessment("Puzzle-Game").unwrap();
        assert_eq!(puzzle.duration_minutes, 30);
        assert_eq!(puzzle.instructions.len(), 5);
        assert!(find_assessment("chess").is_none());
    }
}
