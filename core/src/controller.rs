/// A group of handlers that knows how to mount itself.
///
/// Implemented by the `#[controller]` attribute macro, which also emits a
/// `<Name>Api` OpenAPI struct describing the same routes.
pub trait Controller<S> {
    fn router(state: S) -> axum::Router;
}
