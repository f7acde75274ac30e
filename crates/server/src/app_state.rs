use crate::{api::ApiContext, lessons::LessonLibrary};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    pub(crate) lessons: LessonLibrary,
    pub(crate) secure_cookies: bool,
}
