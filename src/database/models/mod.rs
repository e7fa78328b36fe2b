pub mod education;
pub mod experience;
pub mod message;
pub mod profile;
pub mod skill;
pub mod user;

pub use education::{Education, EducationDraft, EducationPatch};
pub use experience::{Experience, ExperienceDraft, ExperiencePatch};
pub use message::{ContactForm, ContactMessage, MessageFlags};
pub use profile::{Profile, ProfileForm};
pub use skill::{ProficiencyLevel, Skill, SkillDraft, SkillPatch};
pub use user::{Credentials, User};
