//! In-memory content store.
//!
//! State is volatile: every process start begins from the seed data below.

mod repository;

pub use repository::*;

use crate::models::{Profile, Project, Skill};

/// Build the repository loaded with the default site content.
pub fn init_repository() -> Repository {
    let collections = seed_collections();
    tracing::info!(
        profiles = collections.profiles.count(),
        skills = collections.skills.count(),
        projects = collections.projects.count(),
        "Loaded seed content"
    );
    Repository::new(collections)
}

/// The default content every process starts with.
pub fn seed_collections() -> Collections {
    let skills = seed_skills();
    let projects = seed_projects();

    Collections {
        profiles: Collection::seeded(vec![seed_profile()], 1),
        skills: Collection::seeded(skills, 9),
        projects: Collection::seeded(projects, 3),
        contacts: Collection::default(),
    }
}

fn seed_profile() -> Profile {
    Profile {
        id: 1,
        name: "Alex Chen".to_string(),
        title: "Full Stack Developer & UI/UX Designer".to_string(),
        bio: "I create beautiful, functional web applications that solve real-world problems. \
              With 5+ years of experience in modern web technologies, I help businesses build \
              their digital presence."
            .to_string(),
        email: "alex.chen@email.com".to_string(),
        phone: "+1 (555) 123-4567".to_string(),
        location: "San Francisco, CA".to_string(),
        education: "B.S. Computer Science\nUniversity of California, Berkeley".to_string(),
        current_role: "Senior Full Stack Developer\nTech Innovations Inc.".to_string(),
        profile_image_url: Some(
            "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?auto=format&fit=crop&w=400&h=400"
                .to_string(),
        ),
    }
}

fn seed_skills() -> Vec<Skill> {
    let rows: [(&str, &str, &str, i32); 9] = [
        ("Frontend", "React/Next.js", "Expert", 92),
        ("Frontend", "TypeScript", "Advanced", 85),
        ("Frontend", "Tailwind CSS", "Expert", 92),
        ("Backend", "Node.js", "Expert", 85),
        ("Backend", "Python", "Advanced", 80),
        ("Backend", "PostgreSQL", "Advanced", 80),
        ("Tools", "Git/GitHub", "Expert", 92),
        ("Tools", "Docker", "Advanced", 80),
        ("Tools", "AWS", "Intermediate", 60),
    ];

    rows.iter()
        .zip(1..)
        .map(|(&(category, name, level, percentage), id)| Skill {
            id,
            category: category.to_string(),
            name: name.to_string(),
            level: level.to_string(),
            percentage,
        })
        .collect()
}

fn seed_projects() -> Vec<Project> {
    let rows: [(&str, &str, &str, [&str; 3]); 3] = [
        (
            "E-commerce Dashboard",
            "A comprehensive admin dashboard for managing online stores with real-time analytics and inventory management.",
            "https://images.unsplash.com/photo-1460925895917-afdab827c52f?auto=format&fit=crop&w=800&h=400",
            ["React", "Node.js", "MongoDB"],
        ),
        (
            "Fitness Tracker App",
            "Mobile fitness application with workout tracking, progress analytics, and social features for motivation.",
            "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?auto=format&fit=crop&w=800&h=400",
            ["React Native", "Firebase", "Redux"],
        ),
        (
            "Task Management System",
            "Collaborative project management tool with kanban boards, team collaboration, and deadline tracking.",
            "https://images.unsplash.com/photo-1611224923853-80b023f02d71?auto=format&fit=crop&w=800&h=400",
            ["Vue.js", "Express", "MySQL"],
        ),
    ];

    rows.iter()
        .zip(1..)
        .map(|(&(title, description, image_url, technologies), id)| Project {
            id,
            title: title.to_string(),
            description: description.to_string(),
            image_url: image_url.to_string(),
            technologies: technologies.iter().map(|t| t.to_string()).collect(),
            live_url: Some("#".to_string()),
            code_url: Some("#".to_string()),
            featured: true,
        })
        .collect()
}
