//! Synthetic fixtures for demos: fake users, and projects each assigned to a random one of them.

use crate::config::SeedConfig;
use crate::error::StoreError;
use crate::model::{NewProject, NewUser};
use crate::store::DocumentStore;
use fake::faker::internet::en::{DomainSuffix, SafeEmail};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub projects: usize,
}

/// Seeded RNG when `seed` is given, OS entropy otherwise.
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

pub fn fake_users<R: Rng>(rng: &mut R, count: usize) -> Vec<NewUser> {
    (0..count)
        .map(|_| NewUser {
            first_name: Some(FirstName().fake_with_rng(rng)),
            last_name: Some(LastName().fake_with_rng(rng)),
            email: Some(SafeEmail().fake_with_rng(rng)),
        })
        .collect()
}

/// `count` projects, each owned by a uniformly chosen id from `owners`. No owners, no projects.
pub fn fake_projects<R: Rng>(rng: &mut R, owners: &[Uuid], count: usize) -> Vec<(Uuid, NewProject)> {
    if owners.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| {
            let owner = owners[rng.random_range(0..owners.len())];
            let project = NewProject {
                title: Sentence(3..8).fake_with_rng(rng),
                image_url: fake_url(rng),
                description: Paragraph(2..4).fake_with_rng(rng),
                github_url: fake_url(rng),
                deployed_url: fake_url(rng),
            };
            (owner, project)
        })
        .collect()
}

fn fake_url<R: Rng>(rng: &mut R) -> String {
    let host: String = Word().fake_with_rng(rng);
    let suffix: String = DomainSuffix().fake_with_rng(rng);
    format!("https://{}.{}", host, suffix)
}

/// Insert `config.users` users, then `config.projects` projects spread across them.
pub async fn run(store: &dyn DocumentStore, config: &SeedConfig) -> Result<SeedSummary, StoreError> {
    let mut rng = rng_from(config.rng_seed);

    let users = fake_users(&mut rng, config.users);
    let created_users = store.insert_users(&users).await?;
    tracing::info!(count = created_users.len(), "created users");

    let owners: Vec<Uuid> = created_users.iter().map(|u| u.id).collect();
    let projects = fake_projects(&mut rng, &owners, config.projects);
    let created_projects = store.insert_projects(&projects).await?;
    tracing::info!(count = created_projects.len(), "created projects");

    Ok(SeedSummary {
        users: created_users.len(),
        projects: created_projects.len(),
    })
}
