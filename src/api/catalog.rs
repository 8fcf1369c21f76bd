use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::api::posts::NarrationQuery;
use crate::api::recipes::community_recipes;
use crate::app::AppState;
use crate::catalog::{Catalog, OfficialRecipe};
use crate::db::comment_repository::CommentRepository;
use crate::db::models::{Comment, CommentParent, UserRecipe};
use crate::db::recipe_repository::RecipeRepository;
use crate::error::AppError;
use crate::listing::{paginate, ListQuery, ListSpec, Page, RECIPES_PER_PAGE};
use crate::speech::Narration;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogDetail {
    pub recipe: OfficialRecipe,
    pub comments: Vec<Comment>,
}

/// Landing view: a few official recipes and the latest community ones.
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub featured: Vec<OfficialRecipe>,
    pub community: Vec<UserRecipe>,
}

/// Official recipes are searched by name and ingredient list.
pub fn catalog_spec() -> ListSpec<OfficialRecipe> {
    ListSpec::paged(RECIPES_PER_PAGE, |r| {
        vec![r.name.as_str(), r.ingredients.as_str()]
    })
}

pub fn process_list_catalog(catalog: &Catalog, query: &ListQuery) -> Page<OfficialRecipe> {
    paginate(
        catalog.list().to_vec(),
        catalog_spec(),
        query.search(),
        query.page(),
    )
}

fn find_official<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a OfficialRecipe, AppError> {
    catalog
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("Recipe '{id}' not found")))
}

pub async fn process_catalog_detail(
    catalog: &Catalog,
    comments: &dyn CommentRepository,
    id: &str,
) -> Result<CatalogDetail, AppError> {
    let recipe = find_official(catalog, id)?.clone();
    let comments = comments
        .list_for_parent(&CommentParent::Recipe(id.to_string()))
        .await?;

    Ok(CatalogDetail { recipe, comments })
}

pub fn process_catalog_narration(
    catalog: &Catalog,
    id: &str,
    rate: Option<f32>,
) -> Result<Narration, AppError> {
    Ok(Narration::for_official_recipe(find_official(catalog, id)?, rate))
}

pub async fn process_home(
    catalog: &Catalog,
    recipes: &dyn RecipeRepository,
) -> Result<HomeView, AppError> {
    let mut community = community_recipes(recipes).await?;
    community.truncate(RECIPES_PER_PAGE);

    Ok(HomeView {
        featured: catalog.featured().to_vec(),
        community,
    })
}

/// `GET /api/v1/home`
pub async fn home_handler(State(state): State<AppState>) -> Result<Json<HomeView>, AppError> {
    Ok(Json(
        process_home(&state.catalog, state.recipe_repo.as_ref()).await?,
    ))
}

/// `GET /api/v1/catalog`
pub async fn list_catalog_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Page<OfficialRecipe>> {
    Json(process_list_catalog(&state.catalog, &query))
}

/// `GET /api/v1/catalog/{id}`
pub async fn catalog_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CatalogDetail>, AppError> {
    Ok(Json(
        process_catalog_detail(&state.catalog, state.comment_repo.as_ref(), &id).await?,
    ))
}

/// `GET /api/v1/catalog/{id}/narration`
pub async fn catalog_narration_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NarrationQuery>,
) -> Result<Json<Narration>, AppError> {
    Ok(Json(process_catalog_narration(&state.catalog, &id, query.rate)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    const XML: &str = r#"<COOKRCP01>
  <row><RCP_SEQ>1</RCP_SEQ><RCP_NM>Kimchi Fried Rice</RCP_NM><RCP_PARTS_DTLS>rice, kimchi</RCP_PARTS_DTLS></row>
  <row><RCP_SEQ>2</RCP_SEQ><RCP_NM>Spinach Namul</RCP_NM><RCP_PARTS_DTLS>spinach, sesame oil</RCP_PARTS_DTLS></row>
  <row><RCP_SEQ>3</RCP_SEQ><RCP_NM>Soy Braised Tofu</RCP_NM><RCP_PARTS_DTLS>tofu, soy sauce, sesame</RCP_PARTS_DTLS>
    <MANUAL01>Cut tofu.</MANUAL01><MANUAL_IMG01>t1.png</MANUAL_IMG01></row>
  <row><RCP_SEQ>4</RCP_SEQ><RCP_NM>Egg Roll</RCP_NM></row>
  <row><RCP_SEQ>5</RCP_SEQ><RCP_NM>Seaweed Soup</RCP_NM></row>
</COOKRCP01>"#;

    fn catalog() -> Catalog {
        Catalog::from_xml(XML).unwrap()
    }

    #[test]
    fn test_search_name_and_ingredients() {
        let query = ListQuery {
            q: Some("Sesame".into()),
            ..Default::default()
        };
        let page = process_list_catalog(&catalog(), &query);
        let ids: Vec<&str> = page.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);

        let query = ListQuery {
            q: Some("egg".into()),
            ..Default::default()
        };
        assert_eq!(process_list_catalog(&catalog(), &query).total_items, 1);
    }

    #[test]
    fn test_catalog_order_and_paging() {
        let page = process_list_catalog(&catalog(), &ListQuery::default());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page_size, Some(RECIPES_PER_PAGE));
        assert_eq!(page.items[0].id, "1");
        assert_eq!(page.items[4].id, "5");
    }

    #[tokio::test]
    async fn test_detail() {
        let store = MemoryStore::new();
        let detail = process_catalog_detail(&catalog(), &store, "3").await.unwrap();
        assert_eq!(detail.recipe.name, "Soy Braised Tofu");
        assert!(detail.comments.is_empty());

        let missing = process_catalog_detail(&catalog(), &store, "99").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_narration() {
        let narration = process_catalog_narration(&catalog(), "3", Some(1.2)).unwrap();
        assert_eq!(narration.fragments, vec!["Soy Braised Tofu", "Cut tofu."]);
        assert_eq!(narration.rate, 1.2);
    }

    #[tokio::test]
    async fn test_home_features_first_four() {
        let store = MemoryStore::new();
        let home = process_home(&catalog(), &store).await.unwrap();
        let ids: Vec<&str> = home.featured.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert!(home.community.is_empty());
    }
}
