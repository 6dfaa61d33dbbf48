use crate::error::{ParamError, SelectError, SubmitError};
use crate::generation::{GenerateRequest, GenerationApi, GeneratedImage};
use crate::params::GenerationParameters;
use crate::session::Identity;
use crate::storage::{ObjectStorage, UploadOptions, is_accepted_type, storage_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Empty,
    Selected,
    Submitting,
    Completed,
}

/// The image picked for the next submission.
#[derive(Debug, Clone)]
pub struct Selection<P> {
    pub file_name: String,
    pub mime_type: String,
    pub payload: P,
}

/// Everything the submission pipeline needs, captured when the submit starts.
#[derive(Debug, Clone)]
pub struct SubmitPlan<P> {
    pub path: String,
    pub content_type: String,
    pub payload: P,
    pub params: GenerationParameters,
    pub options: UploadOptions,
}

/// Upload-and-generate state for one page.
///
/// Holds at most one selection and one result. `P` is whatever the storage
/// boundary uploads (a browser file handle in the app, bytes in tests).
#[derive(Debug)]
pub struct Workflow<P> {
    selection: Option<Selection<P>>,
    result: Option<GeneratedImage>,
    params: GenerationParameters,
    options: UploadOptions,
    submitting: bool,
}

impl<P> Default for Workflow<P> {
    fn default() -> Self {
        Self::new(UploadOptions::default())
    }
}

impl<P> Workflow<P> {
    pub fn new(options: UploadOptions) -> Self {
        Self {
            selection: None,
            result: None,
            params: GenerationParameters::default(),
            options,
            submitting: false,
        }
    }

    pub fn state(&self) -> WorkflowState {
        if self.submitting {
            WorkflowState::Submitting
        } else if self.result.is_some() {
            WorkflowState::Completed
        } else if self.selection.is_some() {
            WorkflowState::Selected
        } else {
            WorkflowState::Empty
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn selection(&self) -> Option<&Selection<P>> {
        self.selection.as_ref()
    }

    pub fn result(&self) -> Option<&GeneratedImage> {
        self.result.as_ref()
    }

    pub fn params(&self) -> &GenerationParameters {
        &self.params
    }

    /// Checks whether a file of `mime_type` may become the selection, without storing it.
    pub fn admit(&self, identity: Option<&Identity>, mime_type: Option<&str>) -> Result<(), SelectError> {
        if self.submitting {
            return Err(SelectError::Busy);
        }
        if identity.is_none() {
            return Err(SelectError::SignInRequired);
        }
        let mime_type = mime_type.ok_or(SelectError::NoFile)?;
        if !is_accepted_type(mime_type) {
            return Err(SelectError::UnsupportedType(mime_type.to_string()));
        }
        Ok(())
    }

    /// Replaces the selection and drops any previous result.
    pub fn select(&mut self, identity: Option<&Identity>, selection: Selection<P>) -> Result<(), SelectError> {
        self.admit(identity, Some(&selection.mime_type))?;
        log::info!("Selected {} ({})", selection.file_name, selection.mime_type);
        self.selection = Some(selection);
        self.result = None;
        Ok(())
    }

    pub fn set_param(&mut self, name: &str, value: &str) -> Result<bool, ParamError> {
        let changed = self.params.set(name, value)?;
        if changed {
            log::debug!("Parameter {} set to {}", name, value);
        }
        Ok(changed)
    }

    /// Moves to `Submitting` and returns the plan for the pipeline.
    ///
    /// Refuses while a submission is already in flight, whatever the UI shows.
    pub fn begin_submit(&mut self, identity: Option<&Identity>, now_ms: u64) -> Result<SubmitPlan<P>, SubmitError>
    where
        P: Clone,
    {
        if self.submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        let selection = self.selection.as_ref().ok_or(SubmitError::NoSelection)?;
        let identity = identity.ok_or(SubmitError::SignInRequired)?;

        let path = storage_path(&identity.id, now_ms, &selection.file_name, &selection.mime_type);
        let plan = SubmitPlan {
            path,
            content_type: selection.mime_type.clone(),
            payload: selection.payload.clone(),
            params: self.params,
            options: self.options,
        };

        self.submitting = true;
        log::info!("Submitting {} as {}", selection.file_name, plan.path);
        Ok(plan)
    }

    /// Leaves `Submitting`. A success becomes the current result; a failure
    /// keeps the pre-submit selection and result and is handed back to the caller.
    pub fn settle(&mut self, outcome: Result<GeneratedImage, SubmitError>) -> Result<(), SubmitError> {
        self.submitting = false;
        match outcome {
            Ok(image) => {
                log::info!("Generation completed ({} bytes)", image.byte_len());
                self.result = Some(image);
                Ok(())
            }
            Err(err) => {
                log::error!("Submission failed: {}", err);
                Err(err)
            }
        }
    }
}

/// Upload, resolve the public URL, call the generation API, decode the result.
/// Each step runs only after the previous one succeeded.
pub async fn run_submission<S, G>(
    storage: &S,
    api: &G,
    plan: SubmitPlan<S::Payload>,
) -> Result<GeneratedImage, SubmitError>
where
    S: ObjectStorage,
    G: GenerationApi,
{
    storage
        .upload(&plan.path, &plan.payload, &plan.content_type, &plan.options)
        .await
        .map_err(SubmitError::Upload)?;

    let image_url = storage.public_url(&plan.path);
    log::debug!("Uploaded {} -> {}", plan.path, image_url);

    let request = GenerateRequest {
        image_url,
        params: plan.params,
    };
    let response = api.generate(&request).await.map_err(SubmitError::Generation)?;

    GeneratedImage::from_base64(&response.image).map_err(|e| SubmitError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GenerationError, StorageError};
    use crate::generation::GenerateResponse;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeStorage {
        fail_with: Option<String>,
        uploads: RefCell<Vec<(String, String, UploadOptions)>>,
    }

    impl ObjectStorage for FakeStorage {
        type Payload = Vec<u8>;

        async fn upload(
            &self,
            path: &str,
            _payload: &Vec<u8>,
            content_type: &str,
            options: &UploadOptions,
        ) -> Result<(), StorageError> {
            self.uploads
                .borrow_mut()
                .push((path.to_string(), content_type.to_string(), *options));
            match &self.fail_with {
                Some(message) => Err(StorageError::Rejected(message.clone())),
                None => Ok(()),
            }
        }

        fn public_url(&self, path: &str) -> String {
            format!("https://store/public/{}", path)
        }
    }

    struct FakeApi {
        reply: Result<GenerateResponse, GenerationError>,
        requests: RefCell<Vec<GenerateRequest>>,
    }

    impl FakeApi {
        fn replying(image: &str) -> Self {
            Self {
                reply: Ok(GenerateResponse { image: image.to_string() }),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl GenerationApi for FakeApi {
        async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, GenerationError> {
            self.requests.borrow_mut().push(request.clone());
            self.reply.clone()
        }
    }

    fn user() -> Identity {
        Identity::new("u1", Some("driver@rollers.test".into()))
    }

    fn picked(name: &str, mime: &str) -> Selection<Vec<u8>> {
        Selection {
            file_name: name.to_string(),
            mime_type: mime.to_string(),
            payload: vec![0x89, 0x50, 0x4e, 0x47],
        }
    }

    fn submit(
        workflow: &mut Workflow<Vec<u8>>,
        storage: &FakeStorage,
        api: &FakeApi,
        now_ms: u64,
    ) -> Result<(), SubmitError> {
        let plan = workflow.begin_submit(Some(&user()), now_ms)?;
        assert_eq!(workflow.state(), WorkflowState::Submitting);
        let outcome = block_on(run_submission(storage, api, plan));
        workflow.settle(outcome)
    }

    #[test]
    fn test_png_submission_completes() {
        let mut workflow = Workflow::default();
        workflow.select(Some(&user()), picked("car.png", "image/png")).unwrap();
        assert_eq!(workflow.state(), WorkflowState::Selected);

        let storage = FakeStorage::default();
        let api = FakeApi::replying("AAAA");
        submit(&mut workflow, &storage, &api, 1_700_000_000_000).unwrap();

        assert_eq!(workflow.state(), WorkflowState::Completed);
        assert_eq!(workflow.result().unwrap().data_url(), "data:image/png;base64,AAAA");

        let uploads = storage.uploads.borrow();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "user_uploads/u1/1700000000000.png");
        assert_eq!(uploads[0].1, "image/png");
        assert!(!uploads[0].2.upsert);

        let requests = api.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].image_url,
            "https://store/public/user_uploads/u1/1700000000000.png"
        );
        assert_eq!(requests[0].params, GenerationParameters::default());
    }

    #[test]
    fn test_upload_failure_reverts_to_selected() {
        let mut workflow = Workflow::default();
        workflow.select(Some(&user()), picked("car.jpg", "image/jpeg")).unwrap();

        let storage = FakeStorage {
            fail_with: Some("quota exceeded".into()),
            ..Default::default()
        };
        let api = FakeApi::replying("AAAA");
        let err = submit(&mut workflow, &storage, &api, 1).unwrap_err();

        assert_eq!(err.to_string(), "Upload failed: quota exceeded");
        assert_eq!(workflow.state(), WorkflowState::Selected);
        assert!(api.requests.borrow().is_empty());
    }

    #[test]
    fn test_generation_failure_uses_server_message() {
        let mut workflow = Workflow::default();
        workflow.select(Some(&user()), picked("car.png", "image/png")).unwrap();

        let storage = FakeStorage::default();
        let api = FakeApi {
            reply: Err(GenerationError::from_response(500, r#"{"error":"model offline"}"#)),
            requests: RefCell::new(Vec::new()),
        };
        let err = submit(&mut workflow, &storage, &api, 1).unwrap_err();

        assert_eq!(err.to_string(), "Failed to generate image: model offline");
        assert_eq!(workflow.state(), WorkflowState::Selected);
        assert!(workflow.result().is_none());
    }

    #[test]
    fn test_invalid_image_payload_fails() {
        let mut workflow = Workflow::default();
        workflow.select(Some(&user()), picked("car.png", "image/png")).unwrap();

        let err = submit(&mut workflow, &FakeStorage::default(), &FakeApi::replying("%%%"), 1).unwrap_err();
        assert!(matches!(err, SubmitError::InvalidPayload(_)));
        assert_eq!(workflow.state(), WorkflowState::Selected);
    }

    #[test]
    fn test_selection_requires_identity() {
        let mut workflow: Workflow<Vec<u8>> = Workflow::default();
        let err = workflow.select(None, picked("car.png", "image/png")).unwrap_err();
        assert_eq!(err, SelectError::SignInRequired);
        assert!(workflow.selection().is_none());
        assert_eq!(workflow.state(), WorkflowState::Empty);
    }

    #[test]
    fn test_unsupported_type_keeps_prior_state() {
        let mut workflow = Workflow::default();
        workflow.select(Some(&user()), picked("car.png", "image/png")).unwrap();
        submit(&mut workflow, &FakeStorage::default(), &FakeApi::replying("AAAA"), 1).unwrap();

        for mime in ["image/webp", "image/gif", "application/pdf", ""] {
            let err = workflow.select(Some(&user()), picked("other", mime)).unwrap_err();
            assert!(matches!(err, SelectError::UnsupportedType(_)));
        }
        assert_eq!(workflow.selection().unwrap().file_name, "car.png");
        assert_eq!(workflow.state(), WorkflowState::Completed);
        assert_eq!(workflow.admit(Some(&user()), None), Err(SelectError::NoFile));
    }

    #[test]
    fn test_new_selection_clears_result() {
        let mut workflow = Workflow::default();
        workflow.select(Some(&user()), picked("car.png", "image/png")).unwrap();
        submit(&mut workflow, &FakeStorage::default(), &FakeApi::replying("AAAA"), 1).unwrap();
        assert!(workflow.result().is_some());

        workflow.select(Some(&user()), picked("van.jpeg", "image/jpeg")).unwrap();
        assert!(workflow.result().is_none());
        assert_eq!(workflow.state(), WorkflowState::Selected);
    }

    #[test]
    fn test_submit_without_selection() {
        let mut workflow: Workflow<Vec<u8>> = Workflow::default();
        let err = workflow.begin_submit(Some(&user()), 1).unwrap_err();
        assert_eq!(err, SubmitError::NoSelection);
        assert_eq!(workflow.state(), WorkflowState::Empty);
    }

    #[test]
    fn test_double_submit_is_guarded() {
        let mut workflow = Workflow::default();
        workflow.select(Some(&user()), picked("car.png", "image/png")).unwrap();
        let _plan = workflow.begin_submit(Some(&user()), 1).unwrap();

        assert_eq!(
            workflow.begin_submit(Some(&user()), 2).unwrap_err(),
            SubmitError::AlreadySubmitting
        );
        assert_eq!(
            workflow.select(Some(&user()), picked("van.png", "image/png")).unwrap_err(),
            SelectError::Busy
        );
        assert_eq!(workflow.state(), WorkflowState::Submitting);
    }

    #[test]
    fn test_param_updates_do_not_touch_state() {
        let mut workflow = Workflow::default();
        workflow.select(Some(&user()), picked("car.png", "image/png")).unwrap();

        assert_eq!(workflow.set_param("time", "sunset"), Ok(true));
        let params = *workflow.params();
        assert_eq!(workflow.set_param("time", "sunset"), Ok(false));
        assert_eq!(*workflow.params(), params);
        assert_eq!(workflow.state(), WorkflowState::Selected);
    }

    #[test]
    fn test_plan_carries_params_and_extension() {
        let mut workflow = Workflow::new(UploadOptions {
            cache_control_secs: 60,
            upsert: false,
        });
        workflow.select(Some(&user()), picked("front.JPG", "image/jpeg")).unwrap();
        workflow.set_param("ambiance", "moody").unwrap();

        let plan = workflow.begin_submit(Some(&user()), 42).unwrap();
        assert_eq!(plan.path, "user_uploads/u1/42.JPG");
        assert_eq!(plan.params.value(crate::params::ParamName::Ambiance), "moody");
        assert_eq!(plan.options.cache_control_secs, 60);
    }
}
