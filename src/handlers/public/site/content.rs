use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Hero {
    pub greeting: &'static str,
    pub name: &'static str,
    pub tagline: &'static str,
    pub summary: &'static str,
    pub call_to_action: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct About {
    pub paragraphs: &'static [&'static str],
    pub skills_intro: &'static str,
    pub skills: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProjectLinks {
    pub github: &'static str,
    pub live: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub technologies: &'static [&'static str],
    pub image: &'static str,
    pub links: ProjectLinks,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Job {
    pub company: &'static str,
    pub position: &'static str,
    pub duration: &'static str,
    pub description: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Contact {
    pub heading: &'static str,
    pub blurb: &'static str,
    pub email: &'static str,
}

/// Everything the public site renders, in page order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SiteContent {
    pub hero: Hero,
    pub about: About,
    pub projects: &'static [Project],
    pub experience: &'static [Job],
    pub contact: Contact,
}

pub const HERO: Hero = Hero {
    greeting: "Hi, my name is",
    name: "John Doe.",
    tagline: "I build things for the web.",
    summary: "I'm a software engineer specializing in building exceptional digital experiences. \
              Currently, I'm focused on building accessible, human-centered products.",
    call_to_action: "Check out my work",
};

pub const ABOUT: About = About {
    paragraphs: &[
        "Hello! I'm a passionate software developer with a knack for creating intuitive and efficient \
         digital solutions. My journey in tech began during university when I built my first web \
         application, and I've been hooked ever since.",
        "Throughout my career, I've worked on diverse projects ranging from enterprise-level applications \
         to innovative startups. I thrive in dynamic environments where I can leverage my technical skills \
         to solve complex problems and deliver high-quality software.",
        "My approach to development is centered around creating clean, maintainable code that provides \
         exceptional user experiences. I'm constantly expanding my knowledge and experimenting with new \
         technologies to stay at the forefront of the industry.",
    ],
    skills_intro: "Here are a few technologies I've been working with recently:",
    skills: &[
        "JavaScript (ES6+)",
        "TypeScript",
        "React",
        "Node.js",
        "Next.js",
        "Tailwind CSS",
        "Python",
        "RESTful APIs",
        "GraphQL",
        "SQL / NoSQL",
    ],
};

pub const PROJECTS: &[Project] = &[
    Project {
        title: "Enterprise Resource Planning System",
        description: "A comprehensive ERP solution designed to streamline business operations. Features \
                      include inventory management, HR tools, and financial reporting dashboards.",
        technologies: &["React", "Node.js", "PostgreSQL", "Docker"],
        image: "https://images.unsplash.com/photo-1461749280684-dccba630e2f6",
        links: ProjectLinks { github: "#", live: "#" },
    },
    Project {
        title: "AI-Powered Analytics Platform",
        description: "A machine learning platform that analyzes business data to provide actionable \
                      insights. Built with scalability in mind to handle large datasets efficiently.",
        technologies: &["Python", "TensorFlow", "AWS", "React"],
        image: "https://images.unsplash.com/photo-1488590528505-98d2b5aba04b",
        links: ProjectLinks { github: "#", live: "#" },
    },
    Project {
        title: "Secure Authentication Microservice",
        description: "A robust authentication service implementing OAuth 2.0 and JWT for secure user \
                      management across multiple applications.",
        technologies: &["Express.js", "MongoDB", "JWT", "Redis"],
        image: "https://images.unsplash.com/photo-1531297484001-80022131f5a1",
        links: ProjectLinks { github: "#", live: "#" },
    },
];

pub const EXPERIENCE: &[Job] = &[
    Job {
        company: "Tech Innovations Inc",
        position: "Senior Software Engineer",
        duration: "Jan 2022 - Present",
        description: &[
            "Lead development of a microservices architecture that improved system scalability by 200%.",
            "Implemented CI/CD pipeline reducing deployment time by 70%.",
            "Mentored junior developers and conducted code reviews to ensure code quality.",
            "Architected and implemented RESTful APIs used by mobile and web clients.",
        ],
    },
    Job {
        company: "DataSphere Solutions",
        position: "Full Stack Developer",
        duration: "Mar 2018 - Dec 2021",
        description: &[
            "Built responsive front-end interfaces using React and Redux.",
            "Developed backend services using Node.js and Express.",
            "Optimized database queries resulting in 40% performance improvement.",
            "Collaborated with UX designers to create intuitive user interfaces.",
        ],
    },
    Job {
        company: "CloudNexus",
        position: "Software Developer",
        duration: "Jun 2016 - Feb 2018",
        description: &[
            "Developed and maintained cloud-based applications using AWS.",
            "Created automated testing scripts that reduced QA time by 35%.",
            "Participated in agile development cycles and sprint planning.",
            "Improved application security practices and implemented vulnerability scanning.",
        ],
    },
    Job {
        company: "StartUp Labs",
        position: "Junior Developer",
        duration: "Sep 2014 - May 2016",
        description: &[
            "Assisted in development of web applications using JavaScript and PHP.",
            "Designed and implemented database schemas for various projects.",
            "Collaborated with senior developers to troubleshoot complex issues.",
            "Contributed to open-source projects to improve coding skills.",
        ],
    },
];

pub const CONTACT: Contact = Contact {
    heading: "Get In Touch",
    blurb: "I'm currently looking for new opportunities. Whether you have a question or just want to say hi, \
            I'll try my best to get back to you!",
    email: "john@example.com",
};

pub const SITE: SiteContent = SiteContent {
    hero: HERO,
    about: ABOUT,
    projects: PROJECTS,
    experience: EXPERIENCE,
    contact: CONTACT,
};
