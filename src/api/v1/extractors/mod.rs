/*!
 * Authenticated principal extractor
 *
 * Responsibility:
 * - 認証済みリクエストの Principal を handler に提供する
 * - 検証は middleware::auth::access の責務。ここは受け渡しのみ
 */

mod principal;

pub use principal::AuthPrincipal;
