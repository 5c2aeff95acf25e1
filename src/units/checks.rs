use tracing::{debug, warn};
use url::Url;

use crate::cloud::http::fetch_bytes;
use crate::cloud::{CloudSession, ListOptions};
use crate::context::TestContext;
use crate::runner::TestState;

fn outcome<T>(result: &Result<T, crate::cloud::CloudStatus>) -> TestState {
    match result {
        Ok(_) => TestState::Succeeded,
        Err(status) => {
            debug!("Cloud call failed: {}", status);
            TestState::Failed
        }
    }
}

pub async fn connection<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    if ctx.session.is_connected() {
        TestState::Succeeded
    } else {
        TestState::Failed
    }
}

pub async fn root_folder<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let result = ctx.session.root_folder().await;
    let state = outcome(&result);
    if let Ok(folder) = result {
        ctx.root_folder = Some(folder);
    }
    state
}

/// Create the run folder under the root, or adopt an existing one with the
/// same name when creation fails.
pub async fn create_folder<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    ctx.test_folder = None;
    let Some(root) = ctx.root_folder.as_ref() else {
        debug!("No root folder to create a folder in");
        return TestState::Failed;
    };

    match ctx.session.create_folder(ctx.folder_name, root).await {
        Ok(folder) => {
            ctx.test_folder = Some(folder);
            TestState::Succeeded
        }
        Err(status) => {
            debug!(
                "Create folder failed ({}), looking for an existing {}",
                status, ctx.folder_name
            );
            let listing = ctx.session.list_folder(root, &ListOptions::default()).await;
            let existing = listing
                .ok()
                .and_then(|items| items.into_iter().find(|item| item.name == ctx.folder_name));
            match existing {
                Some(folder) => {
                    ctx.test_folder = Some(folder);
                    TestState::Succeeded
                }
                None => TestState::Failed,
            }
        }
    }
}

pub async fn upload_file<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let Some(folder) = ctx.test_folder.as_ref() else {
        debug!("No folder to upload into");
        return TestState::Failed;
    };
    let data = match tokio::fs::read(&ctx.fixture).await {
        Ok(data) => data,
        Err(e) => {
            warn!("Cannot read fixture {}: {}", ctx.fixture.display(), e);
            return TestState::Failed;
        }
    };

    let result = ctx
        .session
        .upload_data(data, ctx.image_name, &folder.identifier, None)
        .await;
    let state = outcome(&result);
    if let Ok(file) = result {
        ctx.test_file = Some(file);
    }
    state
}

/// List the run folder; its first entry becomes the current file.
pub async fn list_folder<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let Some(folder) = ctx.test_folder.as_ref() else {
        return TestState::Failed;
    };

    let options = ListOptions {
        restricted_mode: false,
        show_thumbnails: true,
        flat: false,
        tree: false,
        limit: 0,
        offset: 0,
        ..ListOptions::default()
    };
    let result = ctx.session.list_folder(folder, &options).await;
    let state = outcome(&result);
    if let Some(first) = result.ok().and_then(|items| items.into_iter().next()) {
        ctx.test_file = Some(first);
    }
    state
}

pub async fn file_info<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let Some(file) = ctx.test_file.as_ref() else {
        debug!("No file to get info from");
        return TestState::Failed;
    };

    let result = ctx.session.file_info(file).await;
    let state = outcome(&result);
    if let Ok(info) = result {
        ctx.test_file = Some(info);
    }
    state
}

pub async fn file_content<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let Some(file) = ctx.test_file.as_ref() else {
        return TestState::Failed;
    };
    outcome(&ctx.session.file_content(file).await)
}

pub async fn thumbnail<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let Some(file) = ctx.test_file.as_ref() else {
        return TestState::Failed;
    };
    outcome(&ctx.session.thumbnail(file).await)
}

/// Fetch the file straight from its download URL with the session token.
///
/// The fetch runs on its own task; the check resolves once it is done.
pub async fn download_file<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let (Some(file), Some(token)) = (ctx.test_file.as_ref(), ctx.session.token()) else {
        return TestState::Failed;
    };
    let Some(download_url) = file.download_url.as_deref() else {
        debug!("{} has no download URL", file.name);
        return TestState::Failed;
    };
    let mut url = match Url::parse(download_url) {
        Ok(url) => url,
        Err(e) => {
            warn!("Invalid download URL {}: {}", download_url, e);
            return TestState::Failed;
        }
    };
    url.query_pairs_mut().append_pair("token", token);
    debug!("Downloading {}", download_url);

    match tokio::spawn(fetch_bytes(url)).await {
        Ok(Ok(bytes)) => {
            debug!("Downloaded {} bytes", bytes.len());
            TestState::Succeeded
        }
        Ok(Err(e)) => {
            debug!("Download failed: {}", e);
            TestState::Failed
        }
        Err(e) => {
            warn!("Download task failed: {}", e);
            TestState::Failed
        }
    }
}

pub async fn rename_file<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let Some(file) = ctx.test_file.as_ref() else {
        return TestState::Failed;
    };

    let result = ctx.session.rename(file, ctx.image_name_alt).await;
    let state = outcome(&result);
    if let Ok(renamed) = result {
        ctx.test_file = Some(renamed);
    }
    state
}

pub async fn rename_directory<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let Some(folder) = ctx.test_folder.as_ref() else {
        return TestState::Failed;
    };

    let result = ctx.session.rename(folder, ctx.folder_name_alt).await;
    let state = outcome(&result);
    if let Ok(renamed) = result {
        ctx.test_folder = Some(renamed);
    }
    state
}

/// Copy the current file into the run folder. References stay untouched.
pub async fn copy_file<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let (Some(file), Some(folder)) = (ctx.test_file.as_ref(), ctx.test_folder.as_ref()) else {
        return TestState::Failed;
    };
    outcome(&ctx.session.copy(file, folder).await)
}

// The deleted reference stays in the context.
pub async fn delete_file<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let Some(file) = ctx.test_file.as_ref() else {
        return TestState::Failed;
    };
    outcome(&ctx.session.delete_file(file).await)
}

pub async fn delete_folder<S: CloudSession>(ctx: &mut TestContext<S>) -> TestState {
    let Some(folder) = ctx.test_folder.as_ref() else {
        return TestState::Failed;
    };
    outcome(&ctx.session.delete_folder(folder).await)
}
