use serde::Serialize;

use crate::catalog::OfficialRecipe;
use crate::db::models::{Post, UserRecipe};
use crate::rendering::markup::plain_text;
use crate::speech::engine::SpeechEngine;
use crate::speech::player::{clamp_rate, SpeechPlayer, DEFAULT_LANG, DEFAULT_RATE};

/// The text fragments of one read-aloud session, in speaking order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Narration {
    pub rate: f32,
    pub lang: String,
    pub fragments: Vec<String>,
}

impl Narration {
    pub fn new(fragments: Vec<String>, rate: Option<f32>) -> Self {
        Self {
            rate: rate.map(clamp_rate).unwrap_or(DEFAULT_RATE),
            lang: DEFAULT_LANG.to_string(),
            fragments: fragments
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    /// Recipe name followed by each illustrated step.
    pub fn for_official_recipe(recipe: &OfficialRecipe, rate: Option<f32>) -> Self {
        let fragments = std::iter::once(recipe.name.clone())
            .chain(recipe.manual.iter().map(|step| step.text.clone()))
            .collect();
        Self::new(fragments, rate)
    }

    /// Title, then the steps in order.
    pub fn for_user_recipe(recipe: &UserRecipe, rate: Option<f32>) -> Self {
        let fragments = std::iter::once(recipe.title.clone())
            .chain(recipe.steps.iter().map(|step| step.description.clone()))
            .collect();
        Self::new(fragments, rate)
    }

    /// Title, then the post body with its markup stripped.
    pub fn for_post(post: &Post, rate: Option<f32>) -> Self {
        Self::new(vec![post.title.clone(), plain_text(&post.content)], rate)
    }

    /// Hand the script to `player`, replacing its rate and language.
    pub fn play<E: SpeechEngine>(&self, player: &SpeechPlayer<E>) -> usize {
        player.set_rate(self.rate);
        player.set_lang(self.lang.clone());
        player.play(&self.fragments)
    }
}
