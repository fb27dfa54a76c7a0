/// Label of the synthetic root folder. Leading path segments equal to it are skipped.
pub const SECRET_ROOT: &str = "top-secret";

/// Child of the secret root that never lists its contents.
pub const EASTER_EGG_FOLDER: &str = "sensitive-images";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretNode {
    File { name: String, content: Vec<String> },
    Folder { name: String, children: Vec<SecretNode> },
}

impl SecretNode {
    pub fn file(name: &str, content: &[&str]) -> Self {
        SecretNode::File {
            name: name.into(),
            content: content.iter().map(|l| (*l).into()).collect(),
        }
    }
    pub fn folder(name: &str, children: Vec<SecretNode>) -> Self {
        SecretNode::Folder {
            name: name.into(),
            children,
        }
    }
    pub fn name(&self) -> &str {
        match self {
            SecretNode::File { name, .. } | SecretNode::Folder { name, .. } => name,
        }
    }
    pub fn is_folder(&self) -> bool {
        matches!(self, SecretNode::Folder { .. })
    }
    pub fn children(&self) -> &[SecretNode] {
        match self {
            SecretNode::Folder { children, .. } => children,
            SecretNode::File { .. } => &[],
        }
    }
    pub fn child(&self, name: &str) -> Option<&SecretNode> {
        self.children()
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }
    /// Folders are shown with a trailing slash.
    pub fn display_name(&self) -> String {
        if self.is_folder() {
            format!("{}/", self.name())
        } else {
            self.name().to_string()
        }
    }
    pub fn size(&self) -> usize {
        match self {
            SecretNode::File { content, .. } => content.iter().map(|l| l.len() + 1).sum(),
            SecretNode::Folder { .. } => 4096,
        }
    }
}

pub struct SecretTree {
    root: SecretNode,
}

impl Default for SecretTree {
    fn default() -> Self {
        Self::classified()
    }
}

impl SecretTree {
    pub fn new(children: Vec<SecretNode>) -> Self {
        SecretTree {
            root: SecretNode::folder(SECRET_ROOT, children),
        }
    }

    pub fn classified() -> Self {
        SecretTree::new(vec![
            SecretNode::file(
                "secret-recipe.txt",
                &[
                    "=== GAVINS TOP SECRET RECIPE FOR MANGO STICKY RICE ===",
                    "",
                    "Make the glutinous rice in a rice cooker same as you’d make white rice",
                    "",
                    "Put the whole can of coconut milk in a saucepan and bring it to a simmer",
                    "",
                    "Then add sugar by the spoonful, letting it dissolve and tasting along the way until it’s the sweetness you want",
                    "",
                    "Pour most (not all) of the mixture into the rice and stir until the rice absorbs it",
                    "",
                    "With the remaining coconut milk mixture, mix a small amount of water with corn starch and then add it to the saucepan while stirring until it thickens into a sauce",
                    "",
                    "Plate rice, mango, sauce on top, sesame seeds",
                    "",
                    "--- END OF CLASSIFIED DOCUMENT ---",
                ],
            ),
            SecretNode::file(
                "instant-ramen-tierlist.txt",
                &[
                    "=== INSTANT RAMEN TIERLIST ===",
                    "",
                    "=== S TIER ===",
                    "SHIN Black, Buldak Carbonara, Ottogi Jin Mild/Spicy, Jjajangmen Black Bean, Indomie Mi Goreng, Cup Noodles Curry,",
                    "",
                    "=== A TIER ===",
                    "Buldak Spicy, Ottogi Sesame, Soba Noodle Soup (the one in the green package), Indomie Curry, Igarashi Seimen Okinawa Style Wafu Dashi",
                    "",
                    "=== B TIER ===",
                    "Gomtang Korean Beef, SHIN Original, SHIN Green, Neoguri Spicy Seafood, ",
                    "",
                    "=== C TIER ===",
                    "SHIN Gold, Top Ramen, Maruchan",
                    "",
                    "=== F TIER ===",
                    "Sapporo Ichiban Tonkotsu (flavorless dogwater)",
                ],
            ),
            SecretNode::file(
                "backup-passwords.txt",
                &[
                    "=== BACKUP PASSWORDS (ENCRYPTED) ===",
                    "",
                    "WARNING: This file contains highly sensitive information!",
                    "",
                    "Password: 123456789",
                ],
            ),
            SecretNode::folder(
                EASTER_EGG_FOLDER,
                vec![SecretNode::file(
                    "rickroll.jpg",
                    &["https://www.youtube.com/watch?v=dQw4w9WgXcQ"],
                )],
            ),
        ])
    }

    pub fn root(&self) -> &SecretNode {
        &self.root
    }

    /// Resolve `path` against `cwd`, folding `.` and `..` and dropping a leading root label.
    /// Absolute paths start from the root regardless of `cwd`.
    pub fn normalize(&self, cwd: &[String], path: &str) -> Vec<String> {
        let mut parts: Vec<String> = if path.starts_with('/') {
            Vec::new()
        } else {
            cwd.to_vec()
        };
        for part in path.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                p if parts.is_empty() && p.eq_ignore_ascii_case(SECRET_ROOT) => {}
                p => parts.push(p.to_string()),
            }
        }
        parts
    }

    pub fn resolve_segments(&self, segments: &[String]) -> Option<&SecretNode> {
        let mut node = &self.root;
        for part in segments {
            node = node.child(part)?;
        }
        Some(node)
    }

    /// Pure lookup from a slash-delimited path to a node.
    pub fn resolve(&self, path: &str) -> Option<&SecretNode> {
        self.resolve_segments(&self.normalize(&[], path))
    }

    pub fn display_path(segments: &[String]) -> String {
        if segments.is_empty() {
            format!("/{}", SECRET_ROOT)
        } else {
            format!("/{}/{}", SECRET_ROOT, segments.join("/"))
        }
    }

    /// `ls -la` style rows for the children of `node`.
    pub fn list_detailed(&self, node: &SecretNode) -> Vec<String> {
        let mut out = vec![format!("total {}", node.children().len())];
        for child in node.children() {
            let permissions = if child.is_folder() {
                "dr-x------"
            } else {
                "-r--------"
            };
            out.push(format!(
                "{} {:>3} {:>6} {:>6} {:>6} {} {}",
                permissions,
                1,
                "root",
                "root",
                child.size(),
                "Jan 01 00:00",
                child.display_name()
            ));
        }
        out
    }
}
