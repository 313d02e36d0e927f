//! OpenAPI documentation configuration.
//!
//! Served as JSON at `/openapi.json` and browsable through Swagger UI at `/docs`.

use utoipa::OpenApi;

use crate::api::handlers::{
    category_handler, comment_handler, post_handler, profile_handler, relationship_handler,
    role_handler, user_handler,
};
use crate::api::routes;
use crate::domain::{
    AuthorSummary, CategoryCreate, CategoryDetailResponse, CategoryInPost, CategoryResponse,
    CategoryUpdate, CategoryWithPostCount, CommentCreate, CommentDetailResponse,
    CommentResponse, CommentTreeNode, CommentUpdate, CommentWithReplies, DemoPost, DemoProfile,
    DemoReply, DemoUser, ManyToManyDemo, ManyToOneDemo, OneToManyDemo, OneToOneDemo,
    PostCreate, PostDetailResponse, PostInCategory, PostResponse, PostUpdate, PostWithAuthor,
    PostWithCategories, ProfileCreate, ProfileDetailResponse, ProfileResponse, ProfileUpdate,
    RelationshipKind, ReplyCreate, ReplyResponse, RoleCreate, RoleDetailResponse,
    RoleResponse, RoleUpdate, SelfReferentialDemo, UserCreate, UserInProfile, UserInRole,
    UserResponse, UserUpdate,
};
use crate::types::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Documentation",
        version = "1.0.0",
        description = "Docs for Starter Project"
    ),
    paths(
        routes::root,
        // Users
        user_handler::create_user,
        user_handler::list_users,
        user_handler::list_active_users,
        user_handler::get_user,
        user_handler::get_user_by_email,
        user_handler::get_user_by_username,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::activate_user,
        user_handler::deactivate_user,
        user_handler::user_roles,
        // Posts
        post_handler::create_post,
        post_handler::list_posts,
        post_handler::published_posts,
        post_handler::recent_posts,
        post_handler::search_posts,
        post_handler::get_post,
        post_handler::update_post,
        post_handler::delete_post,
        post_handler::publish_post,
        post_handler::unpublish_post,
        post_handler::add_category,
        post_handler::remove_category,
        // Comments
        comment_handler::create_comment,
        comment_handler::list_comments,
        comment_handler::get_comment,
        comment_handler::update_comment,
        comment_handler::delete_comment,
        comment_handler::reply_to_comment,
        comment_handler::comment_tree,
        // Categories
        category_handler::create_category,
        category_handler::list_categories,
        category_handler::popular_categories,
        category_handler::categories_with_post_counts,
        category_handler::get_category,
        category_handler::update_category,
        category_handler::delete_category,
        category_handler::posts_in_category,
        // Profiles
        profile_handler::create_profile,
        profile_handler::list_profiles,
        profile_handler::get_profile,
        profile_handler::get_profile_by_user_id,
        profile_handler::get_profile_by_username,
        profile_handler::update_profile,
        profile_handler::update_profile_by_user_id,
        profile_handler::delete_profile,
        // Roles
        role_handler::create_role,
        role_handler::list_roles,
        role_handler::get_role,
        role_handler::update_role,
        role_handler::delete_role,
        role_handler::assign_role,
        role_handler::remove_role,
        // Relationship showcase
        relationship_handler::one_to_many,
        relationship_handler::many_to_one,
        relationship_handler::one_to_one,
        relationship_handler::many_to_many,
        relationship_handler::self_referential,
    ),
    components(
        schemas(
            MessageResponse,
            UserCreate, UserUpdate, UserResponse, AuthorSummary,
            PostCreate, PostUpdate, PostResponse, PostDetailResponse, CategoryInPost,
            CategoryCreate, CategoryUpdate, CategoryResponse, CategoryDetailResponse,
            CategoryWithPostCount, PostInCategory,
            CommentCreate, ReplyCreate, CommentUpdate, CommentResponse, CommentDetailResponse,
            ReplyResponse, CommentTreeNode,
            ProfileCreate, ProfileUpdate, ProfileResponse, ProfileDetailResponse, UserInProfile,
            RoleCreate, RoleUpdate, RoleResponse, RoleDetailResponse, UserInRole,
            RelationshipKind, DemoUser, DemoPost, DemoProfile, DemoReply, OneToManyDemo,
            ManyToOneDemo, PostWithAuthor, OneToOneDemo, PostWithCategories, ManyToManyDemo,
            CommentWithReplies, SelfReferentialDemo,
        )
    ),
    tags(
        (name = "Root", description = "Welcome message"),
        (name = "Users", description = "User management"),
        (name = "Posts", description = "Posts and their categories"),
        (name = "Comments", description = "Threaded comments"),
        (name = "Categories", description = "Post categories"),
        (name = "Profiles", description = "One profile per user"),
        (name = "Roles", description = "Roles and user membership"),
        (name = "Relationships Demo", description = "ORM relationship patterns")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_info() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Documentation");
        assert_eq!(doc.info.version, "1.0.0");
        assert_eq!(doc.info.description.as_deref(), Some("Docs for Starter Project"));
    }

    #[test]
    fn test_documents_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/users/{id}",
            "/posts/{id}/categories/{category_id}",
            "/comments/{id}/tree",
            "/categories/popular",
            "/profiles/users/{user_id}",
            "/roles/{id}/users/{user_id}",
            "/relationships-demo/self-referential",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
