use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub email: String,
    pub github: String,
    pub linkedin: String,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: Option<String>,
    pub github: Option<String>,
    pub featured: bool,
}

impl Project {
    fn new(id: &str, title: &str, description: &str, technologies: &[&str]) -> Self {
        Project {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            technologies: technologies.iter().map(|t| (*t).into()).collect(),
            link: None,
            github: None,
            featured: false,
        }
    }

    fn with_link(mut self, link: &str) -> Self {
        self.link = Some(link.into());
        self
    }

    fn with_github(mut self, github: &str) -> Self {
        self.github = Some(github.into());
        self
    }

    fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    /// Name used by `cd <slug>`. Never stored, always derived from the title.
    pub fn slug(&self) -> String {
        slugify(&self.title)
    }

    /// Title with the featured marker, as shown by `info`.
    pub fn display_title(&self) -> String {
        if self.featured {
            format!("{} ★", self.title)
        } else {
            self.title.clone()
        }
    }
}

/// Profile and projects as handed to the page, e.g. for rendering project cards.
#[derive(Debug, Serialize)]
pub struct PortfolioView<'a> {
    pub profile: &'a Profile,
    pub projects: &'a [Project],
}

/// Lower-case the title and collapse every whitespace run into one hyphen.
pub fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn profile() -> Profile {
    Profile {
        name: "Gavin Trent".into(),
        title: "Full Stack Developer".into(),
        bio: [
            "Hello there! I'm a UCLA CS grad from the school of engineering.",
            "I specialize in modern web technologies, LLM applications, and user-friendly products.",
            "",
            "When I'm not coding, you can find me cooking, doing photography, playing video games, or reading the classics.",
            "",
            "I believe in writing clean, maintainable code and building applications that make a difference.",
            "",
            "P.S: try typing the secret command \"continue-game\" :)",
        ]
        .join("\n"),
        contact: Contact {
            email: "gavinjtrent@gmail.com".into(),
            github: "https://github.com/gavintrent".into(),
            linkedin: "https://www.linkedin.com/in/gavin-trent-864775247/".into(),
            twitter: None,
            instagram: Some("https://www.instagram.com/gavin_trent_".into()),
        },
    }
}

pub fn projects() -> Vec<Project> {
    vec![
        Project::new(
            "dreamnet",
            "DreamNet",
            "A social dream journal",
            &[
                "React",
                "Node.js",
                "Express",
                "PostgreSQL",
                "JavaScript",
                "TailwindCSS",
                "RESTful APIs",
            ],
        )
        .with_github("https://github.com/gavintrent/dreamnet")
        .with_link("https://dreamnet-journal.vercel.app/")
        .featured(),
        Project::new(
            "http-web-server",
            "Custom C++ HTTP Web Server",
            "Custom multi-threaded HTTP server using Boost.Asio with dynamic routing, request parsing, and session-based authentication",
            &["CRUD", "RESTful APIs", "Boost.Asio", "C++", "Google Cloud"],
        )
        .with_github("https://github.com/gavintrent/http-web-server")
        .with_link("http://www.name-not-found-404.cs130.org/static1/index.html")
        .featured(),
        Project::new(
            "amc-mcp-server",
            "AMC A-List MCP Server",
            "Model Context Protocol server that integrates with AMC Theatres APIs, exposing structured tools for LLMs including movie listings, theater information, showtimes, and ticket reservations.",
            &["TypeScript", "Express.js", "RESTful APIs", "Docker", "Jest", "Playwright"],
        )
        .with_github("https://github.com/gavintrent/amc-alist-mcp-server")
        .with_link("https://github.com/gavintrent/amc-alist-mcp-server")
        .featured(),
    ]
}
