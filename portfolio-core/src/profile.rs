//! Static portfolio content shared by the console commands and the page
//! sections.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillCategory {
    Backend,
    Database,
    DevOps,
}

impl SkillCategory {
    pub fn label(self) -> &'static str {
        match self {
            SkillCategory::Backend => "BACKEND",
            SkillCategory::Database => "DATABASE",
            SkillCategory::DevOps => "DEVOPS",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skill {
    pub name: &'static str,
    pub level: u8,
    pub category: SkillCategory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Project {
    pub code: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub stack: &'static [&'static str],
    pub github: Option<&'static str>,
    pub demo: Option<&'static str>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Role {
    pub period: &'static str,
    pub position: &'static str,
    pub company: &'static str,
    pub highlights: &'static [&'static str],
    pub technologies: &'static [&'static str],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Channel {
    pub label: &'static str,
    pub value: &'static str,
    pub href: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capability {
    pub icon: &'static str,
    pub text: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stat {
    pub value: u32,
    pub suffix: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Profile {
    pub name: &'static str,
    pub handle: &'static str,
    pub title: &'static str,
    pub location: &'static str,
    pub years: u32,
    pub summary: &'static [&'static str],
    pub capabilities: &'static [Capability],
    pub stats: &'static [Stat],
    pub skills: &'static [Skill],
    pub projects: &'static [Project],
    pub roles: &'static [Role],
    pub channels: &'static [Channel],
    pub projects_url: &'static str,
}

const SKILLS: &[Skill] = &[
    Skill { name: "Node.js", level: 90, category: SkillCategory::Backend },
    Skill { name: "TypeScript", level: 90, category: SkillCategory::Backend },
    Skill { name: "NestJS", level: 80, category: SkillCategory::Backend },
    Skill { name: "GraphQL", level: 60, category: SkillCategory::Backend },
    Skill { name: "PostgreSQL", level: 80, category: SkillCategory::Database },
    Skill { name: "MongoDB", level: 70, category: SkillCategory::Database },
    Skill { name: "Redis", level: 70, category: SkillCategory::Database },
    Skill { name: "Docker", level: 80, category: SkillCategory::DevOps },
    Skill { name: "Kubernetes", level: 50, category: SkillCategory::DevOps },
    Skill { name: "AWS", level: 60, category: SkillCategory::DevOps },
];

const PROJECTS: &[Project] = &[
    Project {
        code: "ECOMMERCE-API",
        title: "E-commerce API",
        summary: "Scalable REST API with microservices, message queues and caching",
        stack: &["Node.js", "NestJS", "PostgreSQL", "Redis", "RabbitMQ", "Docker"],
        github: Some("https://github.com/artemshkonda"),
        demo: None,
    },
    Project {
        code: "REALTIME-CHAT",
        title: "Real-time Chat",
        summary: "WebSocket chat with private rooms, file sharing and notifications",
        stack: &["Node.js", "Socket.io", "MongoDB", "React", "TypeScript"],
        github: Some("https://github.com/artemshkonda"),
        demo: Some("https://demo.artemshkonda.dev"),
    },
    Project {
        code: "TASK-MANAGER",
        title: "Task Management System",
        summary: "Kanban boards with time tracking and Slack integration",
        stack: &["Node.js", "Express", "PostgreSQL", "React", "Docker"],
        github: Some("https://github.com/artemshkonda"),
        demo: None,
    },
    Project {
        code: "PAYMENT-GATEWAY",
        title: "Payment Gateway",
        summary: "Multi-provider payment integration with webhooks and reporting",
        stack: &["Node.js", "TypeScript", "Stripe", "PostgreSQL", "Redis"],
        github: Some("https://github.com/artemshkonda"),
        demo: None,
    },
];

const ROLES: &[Role] = &[
    Role {
        period: "2022 - Present",
        position: "Senior Backend Developer",
        company: "Tech Company",
        highlights: &[
            "Microservices architecture",
            "API optimization & team leadership",
            "Achieved 99.9% uptime",
        ],
        technologies: &["Node.js", "NestJS", "PostgreSQL", "Redis", "Docker", "Kubernetes"],
    },
    Role {
        period: "2020 - 2022",
        position: "Backend Developer",
        company: "Startup Inc",
        highlights: &["Built REST API from scratch", "Database design & auth systems"],
        technologies: &["Node.js", "Express", "MongoDB", "TypeScript", "AWS"],
    },
    Role {
        period: "2018 - 2020",
        position: "Junior Developer",
        company: "Digital Agency",
        highlights: &["Web applications development", "Code reviews & testing"],
        technologies: &["JavaScript", "Node.js", "MySQL", "React"],
    },
];

const CHANNELS: &[Channel] = &[
    Channel {
        label: "Email",
        value: "hello@artemshkonda.dev",
        href: "mailto:hello@artemshkonda.dev",
    },
    Channel {
        label: "Telegram",
        value: "@artem_shkonda",
        href: "https://t.me/artem_shkonda",
    },
    Channel {
        label: "GitHub",
        value: "github.com/artemshkonda",
        href: "https://github.com/artemshkonda",
    },
    Channel {
        label: "LinkedIn",
        value: "linkedin.com/in/artemshkonda",
        href: "https://linkedin.com/in/artemshkonda",
    },
];

const CAPABILITIES: &[Capability] = &[
    Capability { icon: "⚡", text: "REST & GRAPHQL API DESIGN" },
    Capability { icon: "🔧", text: "MICROSERVICES ARCHITECTURE" },
    Capability { icon: "📊", text: "DATABASE OPTIMIZATION" },
    Capability { icon: "🚀", text: "CI/CD PIPELINES" },
    Capability { icon: "💪", text: "HIGH-LOAD SYSTEMS" },
];

const STATS: &[Stat] = &[
    Stat { value: 5, suffix: "+", label: "YEARS EXP" },
    Stat { value: 30, suffix: "+", label: "PROJECTS" },
    Stat { value: 99, suffix: ".9%", label: "UPTIME" },
];

pub const PROFILE: Profile = Profile {
    name: "Artem Shkonda",
    handle: "artem_shkonda",
    title: "Backend Developer",
    location: "Kyiv, Ukraine",
    years: 5,
    summary: &[
        "Backend Developer with 5+ years of experience",
        "building scalable systems and high-performance APIs.",
        "I design APIs and architect microservices that",
        "handle millions of requests.",
    ],
    capabilities: CAPABILITIES,
    stats: STATS,
    skills: SKILLS,
    projects: PROJECTS,
    roles: ROLES,
    channels: CHANNELS,
    projects_url: "github.com/artemshkonda",
};

/// Renders a 20-cell bar such as `██████████████████░░`.
pub fn skill_bar(level: u8) -> String {
    let filled = usize::from(level.min(100)) / 5;
    format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
}

impl Profile {
    pub fn skills_in(&self, category: SkillCategory) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(move |skill| skill.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn skill_bar_has_fixed_width() {
        assert_eq!(skill_bar(90), "██████████████████░░");
        assert_eq!(skill_bar(0), "░".repeat(20));
        assert_eq!(skill_bar(250), "█".repeat(20));
    }

    #[test]
    fn skills_filter_by_category() {
        let names: Vec<_> = PROFILE
            .skills_in(SkillCategory::Database)
            .map(|skill| skill.name)
            .collect();
        assert_eq!(names, vec!["PostgreSQL", "MongoDB", "Redis"]);
    }
}
