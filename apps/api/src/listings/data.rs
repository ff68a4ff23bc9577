// Static catalogue served by the listing store.

use chrono::{Duration, Utc};

use crate::models::listing::{JobListing, JobType};

/// (id, name, logo). Active listing counts are computed by the store.
pub const COMPANIES: [(&str, &str, &str); 5] = [
    ("c1", "Innovatech Solutions", "https://picsum.photos/seed/innovatech/100/100"),
    ("c2", "MarketPro Inc.", "https://picsum.photos/seed/marketpro/100/100"),
    ("c3", "Creative Visions Agency", "https://picsum.photos/seed/creativevisions/100/100"),
    ("c4", "DataDriven Corp", "https://picsum.photos/seed/datadriven/100/100"),
    ("c5", "ScaleFast Ltd.", "https://picsum.photos/seed/scalefast/100/100"),
];

struct Seed {
    id: &'static str,
    title: &'static str,
    company: &'static str,
    logo_seed: &'static str,
    location: &'static str,
    job_type: JobType,
    description: &'static str,
    days_ago: i64,
    salary_range: Option<&'static str>,
    skills: &'static [&'static str],
}

const SEEDS: [Seed; 6] = [
    Seed {
        id: "1",
        title: "Senior Frontend Engineer",
        company: "Innovatech Solutions",
        logo_seed: "innovatech",
        location: "San Francisco, CA",
        job_type: JobType::FullTime,
        description: "Join our dynamic team to build cutting-edge web applications using React, \
            TypeScript, and GraphQL. Lead frontend development efforts and mentor junior engineers.",
        days_ago: 2,
        salary_range: Some("$150,000 - $180,000"),
        skills: &["React", "TypeScript", "GraphQL", "Node.js", "TailwindCSS", "Jest"],
    },
    Seed {
        id: "2",
        title: "Product Marketing Manager",
        company: "MarketPro Inc.",
        logo_seed: "marketpro",
        location: "New York, NY",
        job_type: JobType::FullTime,
        description: "Develop and execute marketing strategies for new product launches. \
            Conduct market research and collaborate with sales and product teams.",
        days_ago: 5,
        salary_range: None,
        skills: &["Marketing Strategy", "Product Launch", "Market Research", "SEO", "Content Marketing"],
    },
    Seed {
        id: "3",
        title: "UX/UI Designer (Contract)",
        company: "Creative Visions Agency",
        logo_seed: "creativevisions",
        location: "Remote",
        job_type: JobType::Contract,
        description: "Design intuitive and visually appealing user interfaces for web and mobile \
            applications. Create wireframes, prototypes, and high-fidelity mockups.",
        days_ago: 1,
        salary_range: Some("$70 - $90 / hour"),
        skills: &["UX Design", "UI Design", "Figma", "Adobe XD", "Prototyping", "User Research"],
    },
    Seed {
        id: "4",
        title: "Data Science Intern",
        company: "DataDriven Corp",
        logo_seed: "datadriven",
        location: "Austin, TX",
        job_type: JobType::Internship,
        description: "Work on real-world data science projects, including data cleaning, analysis, \
            and model building. Learn from experienced data scientists.",
        days_ago: 7,
        salary_range: None,
        skills: &["Python", "R", "SQL", "Machine Learning", "Data Analysis", "Statistics"],
    },
    Seed {
        id: "5",
        title: "Backend Developer (Python/Django)",
        company: "ScaleFast Ltd.",
        logo_seed: "scalefast",
        location: "Remote",
        job_type: JobType::FullTime,
        description: "Design, develop, and maintain scalable backend services and APIs using Python \
            and Django. Work with databases and cloud infrastructure.",
        days_ago: 3,
        salary_range: Some("$120,000 - $150,000"),
        skills: &["Python", "Django", "REST APIs", "PostgreSQL", "AWS", "Docker"],
    },
    Seed {
        id: "6",
        title: "Marketing Intern",
        company: "GrowthHackers Co.",
        logo_seed: "growthhackers",
        location: "Boston, MA (Hybrid)",
        job_type: JobType::Internship,
        description: "Assist the marketing team with social media campaigns, content creation, and \
            market analysis. Gain hands-on experience in digital marketing.",
        days_ago: 4,
        salary_range: None,
        skills: &["Social Media Marketing", "Content Creation", "Google Analytics", "SEO Basics"],
    },
];

/// Builds the listing catalogue with posting dates relative to now.
pub fn mock_listings() -> Vec<JobListing> {
    let now = Utc::now();
    SEEDS
        .iter()
        .map(|seed| JobListing {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            company: seed.company.to_string(),
            company_logo: Some(format!(
                "https://picsum.photos/seed/{}/100/100",
                seed.logo_seed
            )),
            location: seed.location.to_string(),
            job_type: seed.job_type,
            description: seed.description.to_string(),
            posted_date: now - Duration::days(seed.days_ago),
            salary_range: seed.salary_range.map(String::from),
            skills: seed.skills.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}
