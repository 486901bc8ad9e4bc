mod wizard_dto;

pub use wizard_dto::{
    is_photo_mime_allowed, CoordinatesDto, PendingPhotoDto, Step2LocationDto, WizardStep,
    WizardStepResponse, ALLOWED_PHOTO_MIME_TYPES, MAX_PHOTO_BYTES,
};
